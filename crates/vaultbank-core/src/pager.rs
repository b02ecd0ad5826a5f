//! Fixed-size sliding window over a long list
//!
//! The window holds at most `page_size` items. Loading more at the bottom
//! drops items from the top and scrolling back near the top drops items from
//! the bottom, which bounds what is materialized for very long histories.

use serde::Serialize;

/// Items materialized at once
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Scroll offset under which the previous page is brought back
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 200.0;

/// Half-open range `[start, end)` into the filtered, sorted list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PageWindow {
    pub start: usize,
    pub end: usize,
}

impl PageWindow {
    /// `[0, min(page_size, total))`
    pub fn initial(total: usize, page_size: usize) -> Self {
        Self {
            start: 0,
            end: page_size.min(total),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Pull a window that no longer fits (list shrank, bad input) back inside
    /// `0 <= start <= end <= total` and `end - start <= page_size`.
    fn clamp(self, total: usize, page_size: usize) -> Self {
        let end = self.end.min(total);
        let mut start = self.start.min(end);
        if start == end || end - start > page_size {
            start = end.saturating_sub(page_size);
        }
        Self { start, end }
    }

    /// The visible slice of `items`
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let end = self.end.min(items.len());
        let start = self.start.min(end);
        &items[start..end]
    }
}

/// What the list view reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// The bottom edge was reached
    LoadMore,
    /// The list was scrolled; acted on only near the top
    ScrollUp,
}

/// Move `current` in response to a scroll signal, with the default page size
/// and threshold.
pub fn page_window(
    current: PageWindow,
    total: usize,
    direction: ScrollDirection,
    scroll_position: f64,
) -> PageWindow {
    WindowedPager::new(DEFAULT_PAGE_SIZE, DEFAULT_SCROLL_THRESHOLD)
        .step(current, total, direction, scroll_position)
}

/// Window state for one list view
#[derive(Debug, Clone)]
pub struct WindowedPager {
    page_size: usize,
    scroll_threshold: f64,
    total: usize,
    window: PageWindow,
}

impl Default for WindowedPager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_SCROLL_THRESHOLD)
    }
}

impl WindowedPager {
    /// A zero page size is raised to one
    pub fn new(page_size: usize, scroll_threshold: f64) -> Self {
        Self {
            page_size: page_size.max(1),
            scroll_threshold,
            total: 0,
            window: PageWindow::default(),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn window(&self) -> PageWindow {
        self.window
    }

    /// Start over on a new list of `total` items, e.g. after the filter changed
    pub fn reset(&mut self, total: usize) {
        self.total = total;
        self.window = PageWindow::initial(total, self.page_size);
        log::debug!("pager reset: total={} window={:?}", total, self.window);
    }

    /// Bottom reached. Returns whether the window moved.
    pub fn load_more(&mut self) -> bool {
        self.apply(ScrollDirection::LoadMore, 0.0)
    }

    /// Scroll offset reported by the view. Returns whether the window moved.
    pub fn on_scroll(&mut self, offset: f64) -> bool {
        self.apply(ScrollDirection::ScrollUp, offset)
    }

    /// Items before the window
    pub fn has_previous(&self) -> bool {
        self.window.start > 0
    }

    /// Items after the window
    pub fn has_more(&self) -> bool {
        self.window.end < self.total
    }

    fn apply(&mut self, direction: ScrollDirection, offset: f64) -> bool {
        let next = self.step(self.window, self.total, direction, offset);
        let moved = next != self.window;
        if moved {
            log::debug!("pager {:?}: {:?} -> {:?}", direction, self.window, next);
        }
        self.window = next;
        moved
    }

    /// Pure transition used by both the stateful pager and [`page_window`]
    pub fn step(
        &self,
        current: PageWindow,
        total: usize,
        direction: ScrollDirection,
        scroll_position: f64,
    ) -> PageWindow {
        let current = current.clamp(total, self.page_size);

        match direction {
            ScrollDirection::LoadMore if current.end < total => {
                let end = (current.end + self.page_size).min(total);
                PageWindow {
                    start: end.saturating_sub(self.page_size),
                    end,
                }
            }
            ScrollDirection::ScrollUp
                if scroll_position < self.scroll_threshold && current.start > 0 =>
            {
                let start = current.start.saturating_sub(self.page_size);
                PageWindow {
                    start,
                    end: (start + self.page_size).min(total),
                }
            }
            _ => current,
        }
    }
}
