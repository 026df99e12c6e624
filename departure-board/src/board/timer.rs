//! Periodic background refresh.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::transit::TransitApi;

use super::connectivity::Connectivity;
use super::controller::StationBoard;

/// Owns the task that silently refreshes a board every `period`.
///
/// The first refresh happens one full period after starting. Dropping the
/// timer stops it.
pub struct RefreshTimer {
    handle: JoinHandle<()>,
}

impl RefreshTimer {
    pub fn start<A: TransitApi>(
        board: StationBoard<A>,
        connectivity: Connectivity,
        period: Duration,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval.tick().await; // First tick is immediate, skip it
            loop {
                interval.tick().await;
                board.background_refresh(connectivity.is_online()).await;
            }
        });

        Self { handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StationQuery;
    use crate::transit::TransitError;
    use crate::transit::scripted::{ScriptedApi, board};

    const PERIOD: Duration = Duration::from_secs(60);

    async fn loaded_board(api: &ScriptedApi) -> StationBoard<ScriptedApi> {
        api.push_board(board("Bern", &["4"]));
        let station_board = StationBoard::new(api.clone(), 15);
        station_board
            .select_station(StationQuery::parse("Bern").unwrap())
            .await;
        station_board
    }

    #[tokio::test(start_paused = true)]
    async fn refreshes_once_per_period() {
        let api = ScriptedApi::new();
        let station_board = loaded_board(&api).await;
        for _ in 0..3 {
            api.push_board(board("Bern", &["4", "5"]));
        }

        let _timer = RefreshTimer::start(station_board.clone(), Connectivity::default(), PERIOD);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(api.board_calls().len(), 1, "no refresh before first period");

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(api.board_calls().len(), 2);

        tokio::time::sleep(PERIOD * 2).await;
        assert_eq!(api.board_calls().len(), 4);

        let state = station_board.state().await;
        assert_eq!(state.snapshot().unwrap().board.stationboard.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn offline_skips_refresh() {
        let api = ScriptedApi::new();
        let station_board = loaded_board(&api).await;
        let connectivity = Connectivity::new(false);

        let _timer = RefreshTimer::start(station_board, connectivity.clone(), PERIOD);

        tokio::time::sleep(PERIOD * 3 + Duration::from_secs(1)).await;
        assert_eq!(api.board_calls().len(), 1);

        api.push_board(board("Bern", &["4"]));
        connectivity.set_online(true);
        tokio::time::sleep(PERIOD).await;
        assert_eq!(api.board_calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_keep_ticking() {
        let api = ScriptedApi::new();
        let station_board = loaded_board(&api).await;
        api.push_failure(TransitError::Service { status: 500 });
        api.push_board(board("Bern", &["4", "5", "6"]));

        let timer = RefreshTimer::start(station_board.clone(), Connectivity::default(), PERIOD);

        tokio::time::sleep(PERIOD + Duration::from_secs(1)).await;
        let state = station_board.state().await;
        assert_eq!(state.snapshot().unwrap().board.stationboard.len(), 1);
        assert!(timer.is_running());

        tokio::time::sleep(PERIOD).await;
        let state = station_board.state().await;
        assert_eq!(state.snapshot().unwrap().board.stationboard.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_stops_refreshing() {
        let api = ScriptedApi::new();
        let station_board = loaded_board(&api).await;

        let timer = RefreshTimer::start(station_board, Connectivity::default(), PERIOD);
        drop(timer);

        tokio::time::sleep(PERIOD * 5).await;
        assert_eq!(api.board_calls().len(), 1);
    }
}
