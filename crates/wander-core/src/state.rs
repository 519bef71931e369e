//! Shared list state types.

/// Lifecycle phase of one paginated listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListPhase {
    #[default]
    Idle,
    LoadingFirstPage,
    Ready,
    LoadingNextPage,
    Refreshing,
    Error,
}
