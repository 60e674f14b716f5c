//! Character initialization component.
//!
//! Consumes the burst of state the server sends right after entering the
//! world: action bar, proficiencies, bind point, faction standings, and
//! tutorial flags. Snapshots are kept for synchronous reads; the action
//! bar, proficiencies, and bind point additionally publish update streams.

use std::sync::{Arc, Mutex};

use hearthlink_proto::Opcode;
use hearthlink_proto::smsg::{
    ActionButton, ActionButtons, BindPoint, FactionStanding, InitializeFactions, Proficiency,
    TutorialFlags,
};
use tokio::sync::broadcast;

use crate::client::WorldClient;

use super::{ComponentCore, lock};

#[derive(Default)]
struct CharacterState {
    buttons: Option<Arc<ActionButtons>>,
    proficiencies: Vec<Proficiency>,
    bind_point: Option<BindPoint>,
    factions: Vec<FactionStanding>,
    tutorial: Option<TutorialFlags>,
}

/// Login-state component.
pub struct CharacterInit {
    core: ComponentCore,
    state: Arc<Mutex<CharacterState>>,
    buttons_tx: broadcast::Sender<Arc<ActionButtons>>,
    proficiency_tx: broadcast::Sender<Proficiency>,
    bind_tx: broadcast::Sender<BindPoint>,
}

impl CharacterInit {
    /// Build the component and register its opcode streams.
    #[must_use]
    pub fn new(client: Arc<WorldClient>) -> Self {
        let capacity = client.config().update_channel_capacity;
        let core = ComponentCore::new(client);
        let state = Arc::new(Mutex::new(CharacterState::default()));
        let (buttons_tx, _) = broadcast::channel(capacity);
        let (proficiency_tx, _) = broadcast::channel(capacity);
        let (bind_tx, _) = broadcast::channel(capacity);

        {
            let state = Arc::clone(&state);
            let tx = buttons_tx.clone();
            core.spawn_parser(Opcode::SmsgActionButtons, ActionButtons::parse, move |bar| {
                let bar = Arc::new(bar);
                lock(&state).buttons = Some(Arc::clone(&bar));
                let _ = tx.send(bar);
            });
        }
        {
            let state = Arc::clone(&state);
            let tx = proficiency_tx.clone();
            core.spawn_parser(Opcode::SmsgSetProficiency, Proficiency::parse, move |prof| {
                let mut guard = lock(&state);
                // One row per item class; later grants replace earlier.
                match guard.proficiencies.iter_mut().find(|p| p.item_class == prof.item_class) {
                    Some(existing) => *existing = prof,
                    None => guard.proficiencies.push(prof),
                }
                drop(guard);
                let _ = tx.send(prof);
            });
        }
        {
            let state = Arc::clone(&state);
            let tx = bind_tx.clone();
            core.spawn_parser(Opcode::SmsgBindPointUpdate, BindPoint::parse, move |bind| {
                lock(&state).bind_point = Some(bind);
                let _ = tx.send(bind);
            });
        }
        {
            let state = Arc::clone(&state);
            core.spawn_parser(
                Opcode::SmsgInitializeFactions,
                InitializeFactions::parse,
                move |factions| {
                    lock(&state).factions = factions.standings;
                },
            );
        }
        {
            let state = Arc::clone(&state);
            core.spawn_parser(Opcode::SmsgTutorialFlags, TutorialFlags::parse, move |flags| {
                lock(&state).tutorial = Some(flags);
            });
        }

        Self { core, state, buttons_tx, proficiency_tx, bind_tx }
    }

    /// Latest action bar snapshot, if one has arrived.
    #[must_use]
    pub fn action_buttons(&self) -> Option<Arc<ActionButtons>> {
        lock(&self.state).buttons.clone()
    }

    /// One action-bar slot.
    #[must_use]
    pub fn button(&self, slot: usize) -> Option<ActionButton> {
        lock(&self.state).buttons.as_ref().and_then(|bar| bar.slots.get(slot).copied())
    }

    /// The spell bound to a slot, if the slot holds a spell.
    #[must_use]
    pub fn get_spell_for_slot(&self, slot: usize) -> Option<u32> {
        self.button(slot).and_then(ActionButton::spell_id)
    }

    /// Known proficiency grants, one per item class.
    #[must_use]
    pub fn proficiencies(&self) -> Vec<Proficiency> {
        lock(&self.state).proficiencies.clone()
    }

    /// Current hearthstone bind location.
    #[must_use]
    pub fn bind_point(&self) -> Option<BindPoint> {
        lock(&self.state).bind_point
    }

    /// Faction standings table.
    #[must_use]
    pub fn faction_standings(&self) -> Vec<FactionStanding> {
        lock(&self.state).factions.clone()
    }

    /// Tutorial completion flags.
    #[must_use]
    pub fn tutorial_flags(&self) -> Option<TutorialFlags> {
        lock(&self.state).tutorial
    }

    /// Action bar replacement events. The cache is updated before each
    /// emission.
    #[must_use]
    pub fn action_button_updates(&self) -> broadcast::Receiver<Arc<ActionButtons>> {
        self.buttons_tx.subscribe()
    }

    /// Proficiency grant events.
    #[must_use]
    pub fn proficiency_updates(&self) -> broadcast::Receiver<Proficiency> {
        self.proficiency_tx.subscribe()
    }

    /// Bind point change events.
    #[must_use]
    pub fn bind_point_updates(&self) -> broadcast::Receiver<BindPoint> {
        self.bind_tx.subscribe()
    }

    /// Core bookkeeping (in-flight flag, timestamps).
    #[must_use]
    pub fn core(&self) -> &ComponentCore {
        &self.core
    }

    /// Stop the pumps; caches freeze at their last value.
    pub async fn shutdown(&self) {
        self.core.shutdown().await;
    }
}
