use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::{
    background_task::spawn_auto_advance,
    constants::{DESKTOP_BREAKPOINT_PX, DESKTOP_ITEMS_PER_VIEW, MOBILE_ITEMS_PER_VIEW, SWIPE_THRESHOLD_PX},
};

/// Items shown side by side for a viewport width.
pub fn items_per_view_for_width(width: u32) -> usize {
    if width >= DESKTOP_BREAKPOINT_PX {
        DESKTOP_ITEMS_PER_VIEW
    } else {
        MOBILE_ITEMS_PER_VIEW
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselViewState {
    pub index: usize,
    pub items_per_view: usize,
    pub item_count: usize,
    pub hovered: bool,
    #[serde(skip)]
    pub touch_start: Option<f64>,
    #[serde(skip)]
    pub touch_end: Option<f64>,
}

impl CarouselViewState {
    pub fn new(item_count: usize, items_per_view: usize) -> Self {
        CarouselViewState {
            index: 0,
            items_per_view,
            item_count,
            hovered: false,
            touch_start: None,
            touch_end: None,
        }
    }

    pub fn max_index(&self) -> usize {
        self.item_count.saturating_sub(self.items_per_view)
    }

    pub fn advance(&mut self) {
        self.index = if self.index >= self.max_index() { 0 } else { self.index + 1 };
    }

    pub fn retreat(&mut self) {
        self.index = if self.index == 0 { self.max_index() } else { self.index - 1 };
    }

    fn clamp(&mut self) {
        self.index = self.index.min(self.max_index());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    Advanced,
    Retreated,
    Ignored,
}

/// Rotating window over an ordered, already-fetched list of media items.
///
/// Auto-advance runs as a spawned task while the carousel is mounted, has
/// items and is not hovered. Any change to the item set, items-per-view or
/// hover flag aborts the task and starts a fresh one, so the period restarts
/// from zero instead of resuming.
pub struct CarouselController<T> {
    items: Vec<T>,
    state: Arc<Mutex<CarouselViewState>>,
    period: Duration,
    mounted: bool,
    ticker: Option<JoinHandle<()>>,
}

/// Shortest auto-advance period; `tokio::time::interval` rejects zero.
const MIN_PERIOD: Duration = Duration::from_millis(1);

impl<T> CarouselController<T> {
    pub fn new(items: Vec<T>, viewport_width: u32, period: Duration) -> Self {
        let state = CarouselViewState::new(items.len(), items_per_view_for_width(viewport_width));
        CarouselController {
            items,
            state: Arc::new(Mutex::new(state)),
            period: period.max(MIN_PERIOD),
            mounted: false,
            ticker: None,
        }
    }

    /// Starts auto-advance. Must be called inside a tokio runtime.
    pub fn mount(&mut self) {
        self.mounted = true;
        self.restart_timer();
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
        self.stop_timer();
    }

    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        {
            let mut state = self.state.lock();
            state.item_count = self.items.len();
            state.clamp();
        }
        self.restart_timer();
    }

    pub fn advance(&self) {
        self.state.lock().advance();
    }

    pub fn retreat(&self) {
        self.state.lock().retreat();
    }

    /// Dot navigation; out-of-range targets land on the last position.
    pub fn jump_to(&self, index: usize) {
        let mut state = self.state.lock();
        state.index = index.min(state.max_index());
    }

    /// Recomputes items-per-view and clamps the index into the new range.
    pub fn on_resize(&mut self, viewport_width: u32) {
        let per_view = items_per_view_for_width(viewport_width);
        let changed = {
            let mut state = self.state.lock();
            let changed = state.items_per_view != per_view;
            state.items_per_view = per_view;
            state.clamp();
            changed
        };
        if changed {
            self.restart_timer();
        }
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        let changed = {
            let mut state = self.state.lock();
            let changed = state.hovered != hovered;
            state.hovered = hovered;
            changed
        };
        if changed {
            self.restart_timer();
        }
    }

    /// `delta_x` is start minus end; a leftward swipe is positive.
    pub fn on_pointer_drag_end(&self, delta_x: f64) -> SwipeOutcome {
        if delta_x > SWIPE_THRESHOLD_PX {
            self.advance();
            SwipeOutcome::Advanced
        } else if delta_x < -SWIPE_THRESHOLD_PX {
            self.retreat();
            SwipeOutcome::Retreated
        } else {
            SwipeOutcome::Ignored
        }
    }

    pub fn touch_start(&self, x: f64) {
        let mut state = self.state.lock();
        state.touch_start = Some(x);
        state.touch_end = None;
    }

    pub fn touch_move(&self, x: f64) {
        self.state.lock().touch_end = Some(x);
    }

    /// A touch without movement is a tap, not a swipe.
    pub fn touch_end(&self) -> SwipeOutcome {
        let delta = {
            let mut state = self.state.lock();
            let delta = match (state.touch_start, state.touch_end) {
                (Some(start), Some(end)) => start - end,
                _ => 0.0,
            };
            state.touch_start = None;
            state.touch_end = None;
            delta
        };
        self.on_pointer_drag_end(delta)
    }

    pub fn index(&self) -> usize {
        self.state.lock().index
    }

    pub fn items_per_view(&self) -> usize {
        self.state.lock().items_per_view
    }

    pub fn max_index(&self) -> usize {
        self.state.lock().max_index()
    }

    pub fn snapshot(&self) -> CarouselViewState {
        self.state.lock().clone()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Stops the timer and hands back the items.
    pub fn into_items(mut self) -> Vec<T> {
        self.stop_timer();
        std::mem::take(&mut self.items)
    }

    /// Items currently in view.
    pub fn visible(&self) -> &[T] {
        let (index, per_view) = {
            let state = self.state.lock();
            (state.index, state.items_per_view)
        };
        let start = index.min(self.items.len());
        let end = (start + per_view).min(self.items.len());
        &self.items[start..end]
    }

    pub fn is_auto_advancing(&self) -> bool {
        self.ticker.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    fn stop_timer(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }

    fn restart_timer(&mut self) {
        self.stop_timer();

        let should_run = {
            let state = self.state.lock();
            self.mounted && !state.hovered && state.item_count > 0
        };
        if should_run {
            self.ticker = Some(spawn_auto_advance(self.state.clone(), self.period));
        }
    }
}

impl<T> Drop for CarouselController<T> {
    fn drop(&mut self) {
        self.stop_timer();
    }
}
