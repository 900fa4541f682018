//! In-memory editor state.
//!
//! Holds the game being edited (title, ordered pieces, rules) together with the
//! UI state around it (selected piece, selected tool, autosave status). Every
//! mutating operation reports whether the *document* changed, so the caller
//! knows when to arm an autosave.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::editor::{DEFAULT_DROP_X, DEFAULT_DROP_Y, DEFAULT_TITLE, TOOLBAR_PATH_POINTS};
use crate::game::grid::snap_position;
use crate::game::piece::{Piece, PieceKind, PiecePatch, roll_die};
use crate::game::record::{GameDocument, GameDraft};
use crate::game::types::{PieceId, Position, Tool};

/// Outcome of the last autosave attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutosaveStatus {
    #[default]
    Saved,
    Saving,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    title: String,
    pieces: Vec<Piece>,
    selected_piece: Option<PieceId>,
    selected_tool: Tool,
    rules: String,
    autosave_status: AutosaveStatus,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            pieces: Vec::new(),
            selected_piece: None,
            selected_tool: Tool::default(),
            rules: String::new(),
            autosave_status: AutosaveStatus::default(),
        }
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Editor opened on an existing game.
    pub fn from_document(doc: &GameDocument) -> Self {
        let mut state = Self::default();
        state.load(doc);
        state
    }

    /// Replace title, pieces and rules with those of `doc`.
    pub fn load(&mut self, doc: &GameDocument) {
        self.title = doc.title.clone();
        self.pieces = doc.pieces.clone();
        self.rules = doc.rules.clone();
        self.selected_piece = None;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rules(&self) -> &str {
        &self.rules
    }

    /// Pieces in insertion order.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: &str) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    pub fn selected_piece(&self) -> Option<&str> {
        self.selected_piece.as_deref()
    }

    pub fn selected_tool(&self) -> Tool {
        self.selected_tool
    }

    pub fn autosave_status(&self) -> AutosaveStatus {
        self.autosave_status
    }

    pub fn set_autosave_status(&mut self, status: AutosaveStatus) {
        self.autosave_status = status;
    }

    /// Payload for a create or update request.
    pub fn draft(&self) -> GameDraft {
        GameDraft {
            title: self.title.clone(),
            pieces: self.pieces.clone(),
            rules: self.rules.clone(),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> bool {
        let title = title.into();
        if title == self.title {
            return false;
        }
        self.title = title;
        true
    }

    pub fn set_rules(&mut self, rules: impl Into<String>) -> bool {
        let rules = rules.into();
        if rules == self.rules {
            return false;
        }
        self.rules = rules;
        true
    }

    pub fn select_tool(&mut self, tool: Tool) {
        self.selected_tool = tool;
    }

    /// Select a piece, or clear the selection with `None`. Unknown ids clear it too.
    pub fn select_piece(&mut self, id: Option<&str>) {
        self.selected_piece = id
            .filter(|id| self.piece(id).is_some())
            .map(str::to_string);
    }

    /// Place a new piece for `tool` at `at` (snapped to the grid). It goes on
    /// top of the stack and becomes the selection.
    pub fn add_piece(&mut self, tool: Tool, at: Position) -> &Piece {
        let mut rng = rand::rng();
        let at = snap_position(at);
        let piece = Piece::for_tool(
            Uuid::new_v4().to_string(),
            tool,
            at,
            self.pieces.len() as i64,
            &mut rng,
        );
        self.selected_piece = Some(piece.id.clone());
        self.pieces.push(piece);
        &self.pieces[self.pieces.len() - 1]
    }

    /// Toolbar "add" button: place the selected tool's piece at the default spot.
    /// A path gets fixed points instead of ones relative to that spot.
    pub fn add_selected_tool_piece(&mut self) -> &Piece {
        let at = Position::new(DEFAULT_DROP_X, DEFAULT_DROP_Y);
        self.add_piece(self.selected_tool, at);
        let last = self.pieces.len() - 1;
        let piece = &mut self.pieces[last];
        if let PieceKind::Path { points } = &mut piece.kind {
            *points = TOOLBAR_PATH_POINTS.to_vec();
        }
        piece
    }

    /// Merge `patch` into piece `id`. No-op if the piece does not exist.
    pub fn update_piece(&mut self, id: &str, patch: &PiecePatch) -> bool {
        match self.pieces.iter_mut().find(|p| p.id == id) {
            Some(piece) => piece.apply(patch),
            None => false,
        }
    }

    /// Drag end: write the snapped position.
    pub fn move_piece(&mut self, id: &str, to: Position) -> bool {
        self.update_piece(id, &PiecePatch::position(snap_position(to)))
    }

    /// Remove piece `id` and clear the selection.
    pub fn delete_piece(&mut self, id: &str) -> bool {
        let before = self.pieces.len();
        self.pieces.retain(|p| p.id != id);
        self.selected_piece = None;
        self.pieces.len() != before
    }

    pub fn bring_forward(&mut self, id: &str) -> bool {
        self.shift_z_index(id, 1)
    }

    pub fn send_back(&mut self, id: &str) -> bool {
        self.shift_z_index(id, -1)
    }

    fn shift_z_index(&mut self, id: &str, delta: i64) -> bool {
        match self.piece(id) {
            Some(piece) => {
                let z = piece.z_index + delta;
                self.update_piece(id, &PiecePatch::z_index(z))
            }
            None => false,
        }
    }

    /// Pieces in render order: ascending `zIndex`, ties keep insertion order.
    pub fn render_order(&self) -> Vec<&Piece> {
        let mut ordered: Vec<&Piece> = self.pieces.iter().collect();
        ordered.sort_by_key(|p| p.z_index);
        ordered
    }

    /// Give die `id` a fresh roll. False for anything that is not a die.
    pub fn roll_dice(&mut self, id: &str) -> bool {
        match self.piece(id).map(|p| &p.kind) {
            Some(PieceKind::Dice { .. }) => {
                let face = roll_die(&mut rand::rng());
                self.update_piece(id, &PiecePatch::value(i64::from(face)));
                // Rolling the same face still counts as an edit.
                true
            }
            _ => false,
        }
    }

    /// Add `delta` to counter `id`. False for anything that is not a counter.
    pub fn adjust_counter(&mut self, id: &str, delta: i64) -> bool {
        match self.piece(id).map(|p| &p.kind) {
            Some(PieceKind::Counter { value, .. }) => {
                let next = value + delta;
                self.update_piece(id, &PiecePatch::value(next))
            }
            _ => false,
        }
    }

    /// Canvas click. Selects an unselected piece; on the already selected
    /// piece, rolls a die or increments a counter.
    pub fn click_piece(&mut self, id: &str) -> bool {
        if self.piece(id).is_none() {
            return false;
        }
        if self.selected_piece.as_deref() != Some(id) {
            self.selected_piece = Some(id.to_string());
            return false;
        }
        match self.piece(id).map(Piece::tool) {
            Some(Tool::Dice) => self.roll_dice(id),
            Some(Tool::Counter) => self.adjust_counter(id, 1),
            _ => false,
        }
    }
}

/// A user action on the editor, as forwarded to an editor session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data")]
pub enum EditorCommand {
    SetTitle(String),
    SetRules(String),
    SelectTool(Tool),
    SelectPiece(Option<PieceId>),
    AddPiece { tool: Tool, at: Position },
    AddSelectedToolPiece,
    UpdatePiece { id: PieceId, patch: PiecePatch },
    MovePiece { id: PieceId, to: Position },
    DeletePiece(PieceId),
    BringForward(PieceId),
    SendBack(PieceId),
    ClickPiece(PieceId),
    RollDice(PieceId),
    AdjustCounter { id: PieceId, delta: i64 },
}

impl EditorCommand {
    /// Apply to `state`. Returns true if title, pieces or rules changed.
    pub fn apply(self, state: &mut EditorState) -> bool {
        match self {
            EditorCommand::SetTitle(title) => state.set_title(title),
            EditorCommand::SetRules(rules) => state.set_rules(rules),
            EditorCommand::SelectTool(tool) => {
                state.select_tool(tool);
                false
            }
            EditorCommand::SelectPiece(id) => {
                state.select_piece(id.as_deref());
                false
            }
            EditorCommand::AddPiece { tool, at } => {
                state.add_piece(tool, at);
                true
            }
            EditorCommand::AddSelectedToolPiece => {
                state.add_selected_tool_piece();
                true
            }
            EditorCommand::UpdatePiece { id, patch } => state.update_piece(&id, &patch),
            EditorCommand::MovePiece { id, to } => state.move_piece(&id, to),
            EditorCommand::DeletePiece(id) => state.delete_piece(&id),
            EditorCommand::BringForward(id) => state.bring_forward(&id),
            EditorCommand::SendBack(id) => state.send_back(&id),
            EditorCommand::ClickPiece(id) => state.click_piece(&id),
            EditorCommand::RollDice(id) => state.roll_dice(&id),
            EditorCommand::AdjustCounter { id, delta } => state.adjust_counter(&id, delta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(state: &mut EditorState, tool: Tool, x: f64, y: f64) -> PieceId {
        state.add_piece(tool, Position::new(x, y)).id.clone()
    }

    #[test]
    fn new_editor_defaults() {
        let state = EditorState::new();
        assert_eq!(state.title(), "Untitled Game");
        assert!(state.pieces().is_empty());
        assert_eq!(state.selected_tool(), Tool::Tile);
        assert_eq!(state.selected_piece(), None);
        assert_eq!(state.autosave_status(), AutosaveStatus::Saved);
    }

    #[test]
    fn added_piece_is_snapped_stacked_and_selected() {
        let mut state = EditorState::new();
        let first = add(&mut state, Tool::Tile, 13.0, 27.0);
        let second = add(&mut state, Tool::Token, 401.0, 299.0);

        let p1 = state.piece(&first).unwrap();
        assert_eq!((p1.x, p1.y, p1.z_index), (20.0, 20.0, 0));
        let p2 = state.piece(&second).unwrap();
        assert_eq!((p2.x, p2.y, p2.z_index), (400.0, 300.0, 1));
        assert_eq!(state.selected_piece(), Some(second.as_str()));
    }

    #[test]
    fn toolbar_add_uses_selected_tool_at_default_spot() {
        let mut state = EditorState::new();
        state.select_tool(Tool::Shape);
        let piece = state.add_selected_tool_piece();
        assert_eq!(piece.tool(), Tool::Shape);
        assert_eq!(piece.position(), Position::new(400.0, 300.0));
    }

    #[test]
    fn path_placement_depends_on_how_it_is_added() {
        let mut state = EditorState::new();
        state.select_tool(Tool::Path);
        let from_toolbar = state.add_selected_tool_piece().kind.clone();
        assert_eq!(from_toolbar, PieceKind::Path { points: vec![100.0, 100.0, 200.0, 200.0] });

        let dropped = state.add_piece(Tool::Path, Position::new(60.0, 80.0)).kind.clone();
        assert_eq!(dropped, PieceKind::Path { points: vec![60.0, 80.0, 160.0, 180.0] });
    }

    #[test]
    fn every_tool_places_a_piece_of_its_type() {
        let mut state = EditorState::new();
        for tool in Tool::ALL {
            let id = add(&mut state, tool, 100.0, 100.0);
            assert_eq!(state.piece(&id).unwrap().tool(), tool);
        }
        assert_eq!(state.pieces().len(), Tool::ALL.len());
    }

    #[test]
    fn update_merges_and_ignores_unknown_ids() {
        let mut state = EditorState::new();
        let id = add(&mut state, Tool::Card, 0.0, 0.0);
        assert!(state.update_piece(&id, &PiecePatch::text("Draw two")));
        match &state.piece(&id).unwrap().kind {
            PieceKind::Card { text, .. } => assert_eq!(text, "Draw two"),
            other => panic!("unexpected kind {:?}", other),
        }

        let before = state.clone();
        assert!(!state.update_piece("missing", &PiecePatch::text("nope")));
        assert_eq!(state, before);
    }

    #[test]
    fn deleting_selected_piece_clears_selection() {
        let mut state = EditorState::new();
        let keep = add(&mut state, Tool::Tile, 0.0, 0.0);
        let gone = add(&mut state, Tool::Token, 0.0, 0.0);
        assert_eq!(state.selected_piece(), Some(gone.as_str()));

        assert!(state.delete_piece(&gone));
        assert_eq!(state.selected_piece(), None);
        assert!(state.piece(&gone).is_none());
        assert!(state.piece(&keep).is_some());
    }

    #[test]
    fn move_snaps_to_grid() {
        let mut state = EditorState::new();
        let id = add(&mut state, Tool::Token, 0.0, 0.0);
        assert!(state.move_piece(&id, Position::new(55.0, 129.0)));
        assert_eq!(state.piece(&id).unwrap().position(), Position::new(60.0, 120.0));
        // Already on the grid there: no change.
        assert!(!state.move_piece(&id, Position::new(61.0, 121.0)));
    }

    #[test]
    fn reorder_changes_render_order() {
        let mut state = EditorState::new();
        let a = add(&mut state, Tool::Tile, 0.0, 0.0);
        let b = add(&mut state, Tool::Tile, 0.0, 0.0);
        let c = add(&mut state, Tool::Tile, 0.0, 0.0);

        let order: Vec<_> = state.render_order().iter().map(|p| p.id.clone()).collect();
        assert_eq!(order, vec![a.clone(), b.clone(), c.clone()]);

        // a: 0 -> 2, c: 2 -> 1 ties with b and stays behind it.
        state.bring_forward(&a);
        state.bring_forward(&a);
        state.send_back(&c);
        let order: Vec<_> = state.render_order().iter().map(|p| p.id.clone()).collect();
        assert_eq!(order, vec![b, c, a]);
    }

    #[test]
    fn clicking_selected_dice_and_counters() {
        let mut state = EditorState::new();
        let counter = add(&mut state, Tool::Counter, 0.0, 0.0);
        let die = add(&mut state, Tool::Dice, 0.0, 0.0);

        // First click on the counter only selects it.
        assert!(!state.click_piece(&counter));
        assert_eq!(state.selected_piece(), Some(counter.as_str()));
        assert!(state.click_piece(&counter));
        assert!(state.click_piece(&counter));
        match state.piece(&counter).unwrap().kind {
            PieceKind::Counter { value, .. } => assert_eq!(value, 2),
            ref other => panic!("unexpected kind {:?}", other),
        }

        state.click_piece(&die);
        for _ in 0..20 {
            assert!(state.click_piece(&die));
            match state.piece(&die).unwrap().kind {
                PieceKind::Dice { value, .. } => assert!((1..=6).contains(&value)),
                ref other => panic!("unexpected kind {:?}", other),
            }
        }
    }

    #[test]
    fn counters_can_go_down() {
        let mut state = EditorState::new();
        let id = add(&mut state, Tool::Counter, 0.0, 0.0);
        assert!(state.adjust_counter(&id, -3));
        assert!(!state.roll_dice(&id));
        match state.piece(&id).unwrap().kind {
            PieceKind::Counter { value, .. } => assert_eq!(value, -3),
            ref other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn selection_and_tool_changes_are_not_document_edits() {
        let mut state = EditorState::new();
        let id = add(&mut state, Tool::Tile, 0.0, 0.0);
        assert!(!EditorCommand::SelectTool(Tool::Dice).apply(&mut state));
        assert!(!EditorCommand::SelectPiece(None).apply(&mut state));
        assert_eq!(state.selected_piece(), None);
        assert!(!EditorCommand::SelectPiece(Some("nope".into())).apply(&mut state));
        assert_eq!(state.selected_piece(), None);
        assert!(EditorCommand::SetTitle("Chess Variant".into()).apply(&mut state));
        assert!(!EditorCommand::SetTitle("Chess Variant".into()).apply(&mut state));
        assert!(EditorCommand::DeletePiece(id).apply(&mut state));
    }

    #[test]
    fn commands_decode_from_json() {
        let cmd: EditorCommand = serde_json::from_str(
            r#"{"action":"MovePiece","data":{"id":"p1","to":{"x":10,"y":30}}}"#,
        )
        .unwrap();
        assert_eq!(
            cmd,
            EditorCommand::MovePiece { id: "p1".into(), to: Position::new(10.0, 30.0) }
        );
    }
}
