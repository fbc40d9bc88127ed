//! The six readiness facts and the checklist rendered from them.

use callkit_domain::constants::{CONSOLE_URL, NUMBERS_CONSOLE_URL};
use callkit_domain::readiness::{ChecklistControl, ChecklistItem, ChecklistStep};

/// One boolean per checklist step; `ready` is their conjunction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadinessFacts {
    pub account: bool,
    pub phone_number: bool,
    pub calling_number: bool,
    pub local_server: bool,
    pub tunnel: bool,
    pub webhook: bool,
}

impl ReadinessFacts {
    #[must_use]
    pub const fn get(self, step: ChecklistStep) -> bool {
        match step {
            ChecklistStep::Account => self.account,
            ChecklistStep::PhoneNumber => self.phone_number,
            ChecklistStep::CallingNumber => self.calling_number,
            ChecklistStep::LocalServer => self.local_server,
            ChecklistStep::Tunnel => self.tunnel,
            ChecklistStep::Webhook => self.webhook,
        }
    }

    pub const fn set(&mut self, step: ChecklistStep, done: bool) {
        match step {
            ChecklistStep::Account => self.account = done,
            ChecklistStep::PhoneNumber => self.phone_number = done,
            ChecklistStep::CallingNumber => self.calling_number = done,
            ChecklistStep::LocalServer => self.local_server = done,
            ChecklistStep::Tunnel => self.tunnel = done,
            ChecklistStep::Webhook => self.webhook = done,
        }
    }

    #[must_use]
    pub fn ready(self) -> bool {
        ChecklistStep::ALL.into_iter().all(|step| self.get(step))
    }
}

/// What the user can act on right now, beyond the facts themselves.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Affordances {
    pub(crate) number_count: usize,
    pub(crate) can_probe: bool,
    pub(crate) can_update_webhook: bool,
}

pub(crate) fn checklist(facts: ReadinessFacts, affordances: Affordances) -> Vec<ChecklistItem> {
    ChecklistStep::ALL
        .into_iter()
        .map(|step| {
            let done = facts.get(step);
            ChecklistItem {
                step,
                label: step.label().to_owned(),
                description: step.description().to_owned(),
                done,
                control: control(step, done, affordances),
            }
        })
        .collect()
}

fn control(step: ChecklistStep, done: bool, affordances: Affordances) -> Option<ChecklistControl> {
    match step {
        ChecklistStep::Account if done => Some(ChecklistControl::EditCredentials),
        ChecklistStep::Account => Some(ChecklistControl::OpenUrl { url: CONSOLE_URL.to_owned() }),
        ChecklistStep::PhoneNumber if affordances.number_count == 0 => {
            Some(ChecklistControl::OpenUrl { url: NUMBERS_CONSOLE_URL.to_owned() })
        },
        ChecklistStep::PhoneNumber if affordances.number_count > 1 => Some(ChecklistControl::SelectNumber),
        ChecklistStep::Tunnel if affordances.can_probe => Some(ChecklistControl::CheckTunnel),
        ChecklistStep::Webhook if !done && affordances.can_update_webhook => {
            Some(ChecklistControl::UpdateWebhook)
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn facts_from(bits: [bool; 6]) -> ReadinessFacts {
        let mut facts = ReadinessFacts::default();
        for (step, done) in ChecklistStep::ALL.into_iter().zip(bits) {
            facts.set(step, done);
        }
        facts
    }

    proptest! {
        #[test]
        fn ready_iff_every_fact_holds(bits in prop::array::uniform6(any::<bool>())) {
            let facts = facts_from(bits);
            prop_assert_eq!(facts.ready(), bits.iter().all(|b| *b));
        }

        #[test]
        fn clearing_any_fact_closes_the_gate(index in 0usize..6) {
            let mut facts = facts_from([true; 6]);
            prop_assert!(facts.ready());
            facts.set(ChecklistStep::ALL[index], false);
            prop_assert!(!facts.ready());
        }
    }

    #[test]
    fn checklist_follows_step_order() {
        let items = checklist(facts_from([true, true, false, false, false, false]), Affordances::default());

        let steps: Vec<_> = items.iter().map(|item| item.step).collect();
        assert_eq!(steps, ChecklistStep::ALL.to_vec());
        assert!(items[0].done && items[1].done && !items[2].done);
        assert_eq!(items[4].label, "Start ngrok");
    }

    #[test]
    fn controls_track_affordances() {
        let none = checklist(ReadinessFacts::default(), Affordances::default());
        assert_eq!(none[0].control, Some(ChecklistControl::OpenUrl { url: CONSOLE_URL.to_owned() }));
        assert_eq!(
            none[1].control,
            Some(ChecklistControl::OpenUrl { url: NUMBERS_CONSOLE_URL.to_owned() })
        );
        assert_eq!(none[4].control, None);
        assert_eq!(none[5].control, None);

        let busy = checklist(
            facts_from([true, true, true, true, false, false]),
            Affordances { number_count: 2, can_probe: true, can_update_webhook: true },
        );
        assert_eq!(busy[0].control, Some(ChecklistControl::EditCredentials));
        assert_eq!(busy[1].control, Some(ChecklistControl::SelectNumber));
        assert_eq!(busy[4].control, Some(ChecklistControl::CheckTunnel));
        assert_eq!(busy[5].control, Some(ChecklistControl::UpdateWebhook));
    }
}
