use crate::domain::models::actor::{Actor, Role};
use crate::domain::models::booking::Booking;

/// Which slice of the collection a role may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewScope {
    /// Bookings whose customer identity matches the actor.
    Own,
    /// Bookings assigned to the actor's linked artist.
    AssignedToSelf,
    All,
}

/// Which booking fields a role may edit directly. Workflow fields (status,
/// assignment) are always mutated through their own authorities, so
/// `Workflow` grants nothing at the detail-edit surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EditScope {
    None,
    Workflow,
    /// Schedule plus customer/service fields.
    Extended,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteGrant {
    Never,
    /// Only with the actor's elevated flag set.
    Elevated,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilitySet {
    pub view: ViewScope,
    pub edit: EditScope,
    pub assign: bool,
    pub reschedule: bool,
    pub change_status: bool,
    pub delete: DeleteGrant,
}

/// The single capability table. Total over every role; anything not granted
/// here is denied. New roles are rows added here, never checks scattered
/// across call sites.
pub fn resolve(role: Role) -> CapabilitySet {
    match role {
        Role::Member => CapabilitySet {
            view: ViewScope::Own,
            edit: EditScope::None,
            assign: false,
            reschedule: false,
            change_status: false,
            delete: DeleteGrant::Never,
        },
        Role::Artist => CapabilitySet {
            view: ViewScope::AssignedToSelf,
            edit: EditScope::None,
            assign: false,
            reschedule: false,
            change_status: false,
            delete: DeleteGrant::Never,
        },
        Role::Controller => CapabilitySet {
            view: ViewScope::All,
            edit: EditScope::Workflow,
            assign: true,
            reschedule: false,
            change_status: true,
            delete: DeleteGrant::Never,
        },
        Role::Admin => CapabilitySet {
            view: ViewScope::All,
            edit: EditScope::Extended,
            assign: true,
            reschedule: true,
            change_status: true,
            delete: DeleteGrant::Elevated,
        },
        Role::Superadmin => CapabilitySet {
            view: ViewScope::All,
            edit: EditScope::All,
            assign: true,
            reschedule: true,
            change_status: true,
            delete: DeleteGrant::Always,
        },
    }
}

impl CapabilitySet {
    pub fn can_delete(&self, actor: &Actor) -> bool {
        match self.delete {
            DeleteGrant::Never => false,
            DeleteGrant::Elevated => actor.elevated,
            DeleteGrant::Always => true,
        }
    }

    pub fn can_edit_details(&self) -> bool {
        self.edit >= EditScope::Extended
    }

    pub fn sees(&self, actor: &Actor, booking: &Booking) -> bool {
        match self.view {
            ViewScope::All => true,
            ViewScope::Own => actor.owns(&booking.customer_email),
            ViewScope::AssignedToSelf => {
                actor.artist_id.is_some() && booking.assigned_artist_id == actor.artist_id
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_is_total_and_deterministic() {
        let roles = [Role::Member, Role::Artist, Role::Controller, Role::Admin, Role::Superadmin];
        for role in roles {
            assert_eq!(resolve(role), resolve(role));
        }
    }

    #[test]
    fn members_and_artists_hold_no_mutation_rights() {
        for role in [Role::Member, Role::Artist] {
            let caps = resolve(role);
            assert!(!caps.assign);
            assert!(!caps.reschedule);
            assert!(!caps.change_status);
            assert_eq!(caps.edit, EditScope::None);
            assert_eq!(caps.delete, DeleteGrant::Never);
        }
    }

    #[test]
    fn controller_cannot_reschedule_or_delete() {
        let caps = resolve(Role::Controller);
        assert!(caps.change_status);
        assert!(caps.assign);
        assert!(!caps.reschedule);
        assert_eq!(caps.delete, DeleteGrant::Never);
    }

    #[test]
    fn admin_delete_requires_elevated_flag() {
        let caps = resolve(Role::Admin);
        let admin = Actor {
            id: "u1".into(),
            role: Role::Admin,
            email: None,
            artist_id: None,
            elevated: false,
        };
        assert!(!caps.can_delete(&admin));

        let elevated = Actor { elevated: true, ..admin };
        assert!(caps.can_delete(&elevated));
    }

    #[test]
    fn superadmin_deletes_unconditionally() {
        let caps = resolve(Role::Superadmin);
        let actor = Actor {
            id: "u2".into(),
            role: Role::Superadmin,
            email: None,
            artist_id: None,
            elevated: false,
        };
        assert!(caps.can_delete(&actor));
    }
}
