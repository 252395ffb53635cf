// ── Route editor ──
//
// Holds an uncommitted working copy of a line's route. Every edit is a
// local list operation; the only network traffic is the single replace
// request in `commit` and the refetch after it succeeds.

use tracing::{debug, warn};

use crate::backend::TicketingApi;
use crate::error::CoreError;
use crate::model::{BusLine, BusStop, LineId, StopId};

/// Which neighbour a stop swaps with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward the start of the route.
    Up,
    /// Toward the end of the route.
    Down,
}

/// Label for a stop id, falling back to `Stop #<id>` when the loaded
/// catalog does not know it.
pub fn stop_label(stop_id: StopId, catalog: &[BusStop]) -> String {
    catalog
        .iter()
        .find(|s| s.id == stop_id)
        .map_or_else(|| format!("Stop #{stop_id}"), |s| s.name.clone())
}

/// Working copy of a route plus edit-mode state.
///
/// Outside edit mode every mutation is a no-op. `working` may hold the
/// same stop more than once; the server assigns positions on commit.
#[derive(Debug, Clone, Default)]
pub struct RouteEditor {
    working: Vec<StopId>,
    editing: bool,
    cursor: usize,
    error: Option<String>,
}

impl RouteEditor {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Mode ─────────────────────────────────────────────────────────

    /// Enter edit mode with the line's persisted route as the working copy.
    pub fn begin(&mut self, line: &BusLine) {
        self.start(line.stop_ids());
    }

    /// Enter edit mode with an empty route (new line).
    pub fn begin_empty(&mut self) {
        self.start(Vec::new());
    }

    fn start(&mut self, working: Vec<StopId>) {
        self.working = working;
        self.editing = true;
        self.cursor = 0;
        self.error = None;
    }

    /// Discard the working copy and leave edit mode. No backend call.
    pub fn cancel(&mut self) {
        self.working.clear();
        self.editing = false;
        self.cursor = 0;
        self.error = None;
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn working(&self) -> &[StopId] {
        &self.working
    }

    pub fn len(&self) -> usize {
        self.working.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }

    /// Message from the last failed commit, cleared on the next edit.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // ── Edits ────────────────────────────────────────────────────────

    /// Push a stop onto the end of the route. Duplicates are allowed.
    pub fn append(&mut self, stop_id: StopId) {
        if !self.editing {
            return;
        }
        self.working.push(stop_id);
        self.cursor = self.working.len() - 1;
        self.error = None;
    }

    /// Remove the entry at `position`, shifting later entries left.
    /// Returns `false` (and changes nothing) when out of bounds.
    pub fn remove_at(&mut self, position: usize) -> bool {
        if !self.editing || position >= self.working.len() {
            return false;
        }
        self.working.remove(position);
        self.cursor = self.cursor.min(self.working.len().saturating_sub(1));
        self.error = None;
        true
    }

    /// Swap the entry at `position` with its neighbour in `direction`.
    /// Returns `false` (and changes nothing) when that neighbour does not exist.
    pub fn move_adjacent(&mut self, position: usize, direction: Direction) -> bool {
        if !self.editing || position >= self.working.len() {
            return false;
        }
        let target = match direction {
            Direction::Up => match position.checked_sub(1) {
                Some(t) => t,
                None => return false,
            },
            Direction::Down => position + 1,
        };
        if target >= self.working.len() {
            return false;
        }
        self.working.swap(position, target);
        if self.cursor == position {
            self.cursor = target;
        }
        self.error = None;
        true
    }

    // ── Cursor ───────────────────────────────────────────────────────

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn select_next(&mut self) {
        if self.cursor + 1 < self.working.len() {
            self.cursor += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn remove_selected(&mut self) -> bool {
        self.remove_at(self.cursor)
    }

    pub fn move_selected(&mut self, direction: Direction) -> bool {
        self.move_adjacent(self.cursor, direction)
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Persist the working copy with one replace-route request.
    ///
    /// On success edit mode ends and the line is refetched in full, so
    /// server-assigned positions and names are what the caller sees. The
    /// route is saved even when that refetch fails; the result is then
    /// `Ok(None)` and the caller should reload later.
    /// On failure the working copy and edit mode are left untouched and
    /// the server's message is kept in [`RouteEditor::error`].
    pub async fn commit(
        &mut self,
        api: &dyn TicketingApi,
        line_id: LineId,
    ) -> Result<Option<BusLine>, CoreError> {
        if !self.editing {
            return Err(CoreError::Internal("route editor is not in edit mode".into()));
        }

        debug!(line_id, stops = ?self.working, "committing route");
        if let Err(e) = api.set_route(line_id, &self.working).await {
            warn!(line_id, error = %e, "route commit failed");
            self.error = Some(e.to_string());
            return Err(e);
        }

        self.cancel();
        match api.get_line(line_id).await {
            Ok(line) => Ok(Some(line)),
            Err(e) => {
                warn!(line_id, error = %e, "route saved but reload failed");
                Ok(None)
            }
        }
    }

    /// `(position, stop id, label)` for each working entry.
    pub fn entries(&self, catalog: &[BusStop]) -> Vec<(usize, StopId, String)> {
        self.working
            .iter()
            .enumerate()
            .map(|(i, &id)| (i, id, stop_label(id, catalog)))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fake::FakeBackend;
    use pretty_assertions::assert_eq;

    const A: StopId = 1;
    const B: StopId = 2;
    const C: StopId = 3;
    const D: StopId = 4;

    fn editing(route: &[StopId]) -> RouteEditor {
        let mut editor = RouteEditor::new();
        editor.begin_empty();
        for &id in route {
            editor.append(id);
        }
        editor
    }

    fn sorted(ids: &[StopId]) -> Vec<StopId> {
        let mut v = ids.to_vec();
        v.sort_unstable();
        v
    }

    #[test]
    fn append_grows_by_one_and_allows_duplicates() {
        let mut editor = editing(&[A, B]);
        editor.append(A);
        assert_eq!(editor.working(), &[A, B, A]);
    }

    #[test]
    fn remove_at_shrinks_by_one() {
        let mut editor = editing(&[A, B, C]);
        assert!(editor.remove_at(1));
        assert_eq!(editor.working(), &[A, C]);
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let mut editor = editing(&[A, B]);
        assert!(!editor.remove_at(2));
        assert_eq!(editor.working(), &[A, B]);
    }

    #[test]
    fn move_preserves_length_and_members() {
        let mut editor = editing(&[A, B, C, A]);
        let before = sorted(editor.working());
        for pos in 0..4 {
            editor.move_adjacent(pos, Direction::Down);
            editor.move_adjacent(pos, Direction::Up);
            assert_eq!(editor.len(), 4);
            assert_eq!(sorted(editor.working()), before);
        }
    }

    #[test]
    fn moves_past_the_ends_are_noops() {
        let mut editor = editing(&[A, B, C]);
        assert!(!editor.move_adjacent(0, Direction::Up));
        assert!(!editor.move_adjacent(2, Direction::Down));
        assert_eq!(editor.working(), &[A, B, C]);
    }

    #[test]
    fn edit_sequence_example() {
        let mut editor = editing(&[A, B, C]);
        editor.move_adjacent(0, Direction::Down);
        assert_eq!(editor.working(), &[B, A, C]);
        editor.remove_at(2);
        assert_eq!(editor.working(), &[B, A]);
        editor.append(D);
        assert_eq!(editor.working(), &[B, A, D]);
    }

    #[test]
    fn cursor_follows_moved_entry() {
        let mut editor = editing(&[A, B, C]);
        editor.select_prev();
        editor.select_prev();
        assert_eq!(editor.cursor(), 0);
        assert!(editor.move_selected(Direction::Down));
        assert_eq!(editor.cursor(), 1);
        assert_eq!(editor.working(), &[B, A, C]);
    }

    #[test]
    fn edits_outside_edit_mode_are_ignored() {
        let mut editor = RouteEditor::new();
        editor.append(A);
        assert!(editor.is_empty());
        assert!(!editor.remove_at(0));
    }

    #[test]
    fn cancel_discards_working_copy() {
        let mut editor = editing(&[A, B]);
        editor.cancel();
        assert!(!editor.is_editing());
        assert!(editor.is_empty());
    }

    #[test]
    fn unknown_stop_gets_placeholder_label() {
        let catalog = vec![BusStop {
            id: A,
            name: "Central Station".into(),
            latitude: None,
            longitude: None,
        }];
        assert_eq!(stop_label(A, &catalog), "Central Station");
        assert_eq!(stop_label(42, &catalog), "Stop #42");
    }

    #[tokio::test]
    async fn commit_sends_one_request_and_refetches() {
        let api = FakeBackend::new();
        let line = api.get_line(1).await.unwrap();
        let mut editor = RouteEditor::new();
        editor.begin(&line);
        editor.move_adjacent(0, Direction::Down);
        editor.append(C);

        let calls_before = api.call_count().await;
        let saved = editor.commit(&api, 1).await.unwrap().unwrap();

        assert!(!editor.is_editing());
        assert_eq!(saved.stop_ids(), vec![B, A, C]);
        let orders: Vec<u32> = saved.stops.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(
            api.calls().await[calls_before..],
            ["set_route(1, [2, 1, 3])", "get_line(1)"]
        );
    }

    #[tokio::test]
    async fn failed_commit_keeps_working_copy_and_edit_mode() {
        let api = FakeBackend::new();
        let line = api.get_line(1).await.unwrap();
        let mut editor = RouteEditor::new();
        editor.begin(&line);
        editor.append(C);
        api.fail_next(500, "Internal Server Error").await;

        let err = editor.commit(&api, 1).await.unwrap_err();

        assert_eq!(err.to_string(), "Internal Server Error");
        assert!(editor.is_editing());
        assert_eq!(editor.working(), &[A, B, C]);
        assert_eq!(editor.error(), Some("Internal Server Error"));
        assert_eq!(api.get_line(1).await.unwrap().stop_ids(), vec![A, B]);
    }

    #[tokio::test]
    async fn saved_route_survives_failed_reload() {
        let api = FakeBackend::new();
        let line = api.get_line(1).await.unwrap();
        let mut editor = RouteEditor::new();
        editor.begin(&line);
        editor.append(C);
        api.fail_after(1, 503, "Service Unavailable").await;

        assert_eq!(editor.commit(&api, 1).await.unwrap(), None);

        assert!(!editor.is_editing());
        assert_eq!(editor.error(), None);
        assert_eq!(api.get_line(1).await.unwrap().stop_ids(), vec![A, B, C]);
    }

    #[tokio::test]
    async fn editing_makes_no_backend_calls() {
        let api = FakeBackend::new();
        let line = api.get_line(1).await.unwrap();
        let before = api.call_count().await;

        let mut editor = RouteEditor::new();
        editor.begin(&line);
        editor.append(C);
        editor.remove_at(0);
        editor.move_adjacent(0, Direction::Down);
        editor.cancel();

        assert_eq!(api.call_count().await, before);
    }
}
