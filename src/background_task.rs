use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant},
};

use crate::use_cases::carousel::CarouselViewState;

/// Advances the carousel once per `period`, first tick one full period from now.
///
/// The returned handle is the only way to stop the loop; callers abort it.
pub fn spawn_auto_advance(state: Arc<Mutex<CarouselViewState>>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + period, period);

        loop {
            interval.tick().await;

            let index = {
                let mut view = state.lock();
                view.advance();
                view.index
            };
            tracing::trace!(index, "Carousel auto-advanced");
        }
    })
}
