/// Traversal direction of a cursor call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Observable cursor phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Nothing fetched yet.
    Empty,
    /// A page is loaded and the last call yielded an item.
    Buffered,
    /// The last forward call found no more items.
    ExhaustedForward,
    /// The last backward call found no more items.
    ExhaustedBackward,
}

/// What a cursor call has to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    Yield,
    Fetch(FetchTarget),
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FetchTarget {
    /// Starting URL plus the caller's query.
    Initial,
    /// A `next` or `previous` link, which carries its own query.
    Link(String),
}

#[derive(Debug)]
pub(crate) struct Page<T> {
    pub(crate) items: Vec<T>,
    pub(crate) next: Option<String>,
    pub(crate) previous: Option<String>,
    /// No forward fetch may follow this page.
    pub(crate) last: bool,
}

/// Loaded page, position between its items, and phase.
#[derive(Debug)]
pub(crate) struct Buffer<T> {
    page: Option<Page<T>>,
    // 0..=items.len(); forward yields items[position], backward items[position - 1]
    position: usize,
    state: CursorState,
}

impl<T> Default for Buffer<T> {
    fn default() -> Self {
        Self {
            page: None,
            position: 0,
            state: CursorState::Empty,
        }
    }
}

impl<T> Buffer<T> {
    pub(crate) fn state(&self) -> CursorState {
        self.state
    }

    pub(crate) fn page(&self) -> Option<&Page<T>> {
        self.page.as_ref()
    }
}

impl<T: Clone> Buffer<T> {
    /// Decides the next step for `direction`. Total over every phase.
    pub(crate) fn plan(&self, direction: Direction, limit_reached: bool) -> Step {
        if limit_reached {
            return Step::Exhausted;
        }

        let Some(page) = &self.page else {
            return match direction {
                Direction::Forward => Step::Fetch(FetchTarget::Initial),
                Direction::Backward => Step::Exhausted,
            };
        };

        match direction {
            Direction::Forward if self.position < page.items.len() => Step::Yield,
            Direction::Forward if page.last => Step::Exhausted,
            Direction::Forward => page
                .next
                .clone()
                .map_or(Step::Exhausted, |link| Step::Fetch(FetchTarget::Link(link))),
            Direction::Backward if self.position > 0 => Step::Yield,
            Direction::Backward => page
                .previous
                .clone()
                .map_or(Step::Exhausted, |link| Step::Fetch(FetchTarget::Link(link))),
        }
    }

    /// Takes the item on the `direction` side of the position. Callers plan first.
    pub(crate) fn take(&mut self, direction: Direction) -> Option<T> {
        let page = self.page.as_ref()?;
        let item = match direction {
            Direction::Forward => {
                let item = page.items.get(self.position)?.clone();
                self.position += 1;
                item
            }
            Direction::Backward => {
                let index = self.position.checked_sub(1)?;
                let item = page.items.get(index)?.clone();
                self.position = index;
                item
            }
        };
        self.state = CursorState::Buffered;
        Some(item)
    }

    /// Installs a freshly decoded page. Backward fetches start at its end.
    pub(crate) fn replace(&mut self, page: Page<T>, direction: Direction) {
        self.position = match direction {
            Direction::Forward => 0,
            Direction::Backward => page.items.len(),
        };
        self.page = Some(page);
        self.state = CursorState::Buffered;
    }

    pub(crate) fn exhaust(&mut self, direction: Direction) {
        self.state = match direction {
            Direction::Forward => CursorState::ExhaustedForward,
            Direction::Backward => CursorState::ExhaustedBackward,
        };
    }
}
