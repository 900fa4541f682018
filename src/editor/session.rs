//! Editor session actor.
//!
//! Owns the [`EditorState`] of one open game and persists it through a
//! [`GameGateway`]. Every edit to title, pieces or rules cancels the pending
//! autosave timer and arms a new one; when it expires the whole draft is sent
//! as an update, provided the game already has a server id. Nothing prevents
//! two autosave requests from overlapping: the last one to land wins.

use actix::prelude::*;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::client::{GameGateway, GatewayError};
use crate::config::editor::AUTOSAVE_DEBOUNCE_MS;
use crate::editor::state::{AutosaveStatus, EditorCommand, EditorState};
use crate::game::record::GameDocument;
use crate::game::types::GameId;

/// Main editor session actor.
pub struct EditorSession {
    /// Game being edited.
    state: EditorState,
    /// Server id, once the game has been created.
    game_id: Option<GameId>,
    gateway: Arc<dyn GameGateway>,
    /// Quiet period before an autosave fires.
    debounce: Duration,
    /// Armed autosave timer, if any.
    pending: Option<SpawnHandle>,
}

impl EditorSession {
    /// Session on a game that has never been saved.
    pub fn new(gateway: Arc<dyn GameGateway>) -> Self {
        Self {
            state: EditorState::new(),
            game_id: None,
            gateway,
            debounce: Duration::from_millis(AUTOSAVE_DEBOUNCE_MS),
            pending: None,
        }
    }

    /// Session on an existing game.
    pub fn editing(doc: &GameDocument, gateway: Arc<dyn GameGateway>) -> Self {
        let mut session = Self::new(gateway);
        session.state = EditorState::from_document(doc);
        session.game_id = Some(doc.id);
        session
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    fn cancel_autosave(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.pending.take() {
            ctx.cancel_future(handle);
        }
    }

    /// Restart the debounce timer after a document change.
    fn arm_autosave(&mut self, ctx: &mut Context<Self>) {
        self.cancel_autosave(ctx);
        if self.game_id.is_none() {
            // Unsaved games wait for an explicit save.
            return;
        }
        self.state.set_autosave_status(AutosaveStatus::Saving);
        let handle = ctx.run_later(self.debounce, |act, ctx| {
            act.pending = None;
            act.fire_autosave(ctx);
        });
        self.pending = Some(handle);
    }

    fn fire_autosave(&mut self, ctx: &mut Context<Self>) {
        let Some(game_id) = self.game_id else {
            return;
        };
        let draft = self.state.draft();
        let gateway = self.gateway.clone();
        debug!("[Editor] Autosaving game_id={} ({} pieces)", game_id, draft.pieces.len());

        let request = async move { gateway.update(game_id, &draft).await };
        ctx.spawn(request.into_actor(self).map(move |res, act, _ctx| {
            // A newer edit is already waiting; its autosave decides the status.
            let superseded = act.pending.is_some();
            match res {
                Ok(_) => {
                    if !superseded {
                        act.state.set_autosave_status(AutosaveStatus::Saved);
                    }
                }
                Err(e) => {
                    error!("[Editor] Autosave failed for game_id={}: {}", game_id, e);
                    if !superseded {
                        act.state.set_autosave_status(AutosaveStatus::Error);
                    }
                }
            }
        }));
    }
}

impl Actor for EditorSession {
    type Context = Context<Self>;

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if self.pending.is_some() {
            warn!("[Editor] Session closed with an unsaved change pending");
        }
    }
}

/// Message: apply a user action. Returns true if the document changed.
#[derive(Message)]
#[rtype(result = "bool")]
pub struct Edit(pub EditorCommand);

/// Message: read the current editor state.
#[derive(Message)]
#[rtype(result = "SessionSnapshot")]
pub struct Snapshot;

/// Message: user-initiated save. Creates the game on first save.
#[derive(Message)]
#[rtype(result = "Result<GameDocument, GatewayError>")]
pub struct Save;

/// Message: replace the session content with a game fetched from the server.
#[derive(Message)]
#[rtype(result = "Result<(), GatewayError>")]
pub struct Load(pub GameId);

#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub state: EditorState,
    pub game_id: Option<GameId>,
}

impl Handler<Edit> for EditorSession {
    type Result = bool;

    fn handle(&mut self, msg: Edit, ctx: &mut Self::Context) -> Self::Result {
        let changed = msg.0.apply(&mut self.state);
        if changed {
            self.arm_autosave(ctx);
        }
        changed
    }
}

impl Handler<Snapshot> for EditorSession {
    type Result = MessageResult<Snapshot>;

    fn handle(&mut self, _msg: Snapshot, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(SessionSnapshot {
            state: self.state.clone(),
            game_id: self.game_id,
        })
    }
}

impl Handler<Save> for EditorSession {
    type Result = ResponseActFuture<Self, Result<GameDocument, GatewayError>>;

    fn handle(&mut self, _msg: Save, ctx: &mut Self::Context) -> Self::Result {
        // This save covers whatever the timer would have sent.
        self.cancel_autosave(ctx);
        let draft = self.state.draft();
        let gateway = self.gateway.clone();
        let game_id = self.game_id;

        let request = async move {
            match game_id {
                Some(id) => gateway.update(id, &draft).await,
                None => gateway.create(&draft).await,
            }
        };

        Box::pin(request.into_actor(self).map(move |res, act, _ctx| {
            match &res {
                Ok(doc) => {
                    if game_id.is_none() {
                        info!("[Editor] Game created, now editing game_id={}", doc.id);
                    }
                    act.game_id = Some(doc.id);
                    if act.pending.is_none() {
                        act.state.set_autosave_status(AutosaveStatus::Saved);
                    }
                }
                Err(e) => {
                    error!("[Editor] Save failed: {}", e);
                    // The cancelled autosave will not settle the status either.
                    if act.pending.is_none() {
                        act.state.set_autosave_status(AutosaveStatus::Error);
                    }
                }
            }
            res
        }))
    }
}

impl Handler<Load> for EditorSession {
    type Result = ResponseActFuture<Self, Result<(), GatewayError>>;

    fn handle(&mut self, msg: Load, ctx: &mut Self::Context) -> Self::Result {
        self.cancel_autosave(ctx);
        let gateway = self.gateway.clone();
        let game_id = msg.0;
        let request = async move { gateway.load(game_id).await };

        Box::pin(request.into_actor(self).map(move |res, act, _ctx| match res {
            Ok(doc) => {
                act.state.load(&doc);
                act.state.set_autosave_status(AutosaveStatus::Saved);
                act.game_id = Some(doc.id);
                Ok(())
            }
            Err(e) => {
                error!("[Editor] Failed to load game_id={}: {}", game_id, e);
                if act.pending.is_none()
                    && act.state.autosave_status() == AutosaveStatus::Saving
                {
                    act.state.set_autosave_status(AutosaveStatus::Error);
                }
                Err(e)
            }
        }))
    }
}
