use serde::Serialize;

use crate::models::{Actor, Booking, Role};

/// What an actor may do with one booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Capabilities {
    pub view: bool,
    /// Client name, phone and message are visible.
    pub view_details: bool,
    pub edit: bool,
    pub delete: bool,
}

impl Capabilities {
    pub fn full() -> Self {
        Self {
            view: true,
            view_details: true,
            edit: true,
            delete: true,
        }
    }

    /// Visible on the calendar, but not whose booking it is.
    pub fn view_only() -> Self {
        Self {
            view: true,
            ..Self::default()
        }
    }
}

/// Decides which bookings belong to which actor.
pub trait OwnershipPolicy: Send + Sync {
    fn capabilities(&self, actor: &Actor, booking: &Booking) -> Capabilities;
}

/// Matches actors to bookings by name, phone and designer-field text.
///
/// Designer names are free text, so matching ignores case and accepts a designer field that
/// contains the actor's name (`"Claire Dubois"` belongs to `Claire`). The reverse never holds: a
/// short designer field must not match every actor whose name contains it.
pub struct NameMatchPolicy;

fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    !needle.is_empty() && haystack.to_lowercase().contains(&needle)
}

fn designer_matches(designer: &str, actor_name: &str) -> bool {
    let designer = designer.trim();
    let actor_name = actor_name.trim();
    if designer.is_empty() || actor_name.is_empty() {
        return false;
    }
    designer.eq_ignore_ascii_case(actor_name) || contains_ci(designer, actor_name)
}

impl NameMatchPolicy {
    fn owns(&self, actor: &Actor, booking: &Booking) -> bool {
        match actor.role {
            Role::Admin => true,
            Role::Designer | Role::Technician => designer_matches(&booking.designer_name, &actor.name),
            Role::User => {
                let name = actor.name.trim();
                let phone = actor.phone.trim();
                (!name.is_empty() && booking.client_name.trim() == name)
                    || (!phone.is_empty() && booking.client_phone.trim() == phone)
                    || contains_ci(&booking.designer_name, name)
                    || contains_ci(&booking.designer_name, &actor.email)
            }
        }
    }
}

impl OwnershipPolicy for NameMatchPolicy {
    fn capabilities(&self, actor: &Actor, booking: &Booking) -> Capabilities {
        if self.owns(actor, booking) {
            Capabilities::full()
        } else {
            Capabilities::view_only()
        }
    }
}

/// Bookings as `actor` may see them, with client detail withheld where required.
pub fn visible_bookings(
    policy: &dyn OwnershipPolicy,
    actor: &Actor,
    bookings: Vec<Booking>,
) -> Vec<Booking> {
    bookings
        .into_iter()
        .filter_map(|booking| {
            let caps = policy.capabilities(actor, &booking);
            if !caps.view {
                None
            } else if caps.view_details {
                Some(booking)
            } else {
                Some(booking.redacted())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CalendarId;
    use chrono::{NaiveDate, NaiveDateTime};

    fn actor(role: Role, name: &str, email: &str, phone: &str) -> Actor {
        Actor {
            role,
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        }
    }

    fn booking(designer: &str) -> Booking {
        Booking {
            id: "b-1".to_string(),
            calendar: CalendarId::Metre,
            date: NaiveDate::from_ymd_opt(2025, 11, 18).unwrap(),
            slot: "9h00".to_string(),
            client_name: "Martin".to_string(),
            client_phone: "0601020304".to_string(),
            designer_name: designer.to_string(),
            message: Some("Cuisine".to_string()),
            created_at: NaiveDateTime::parse_from_str("2025-11-01 08:00", "%Y-%m-%d %H:%M")
                .unwrap(),
        }
    }

    #[test]
    fn test_admin_has_full_access() {
        let caps = NameMatchPolicy.capabilities(&Actor::admin(), &booking("Claire"));
        assert_eq!(caps, Capabilities::full());
    }

    #[test]
    fn test_designer_exact_and_loose_match() {
        let claire = actor(Role::Designer, "Claire", "", "");
        assert!(NameMatchPolicy.capabilities(&claire, &booking("claire")).edit);
        assert!(NameMatchPolicy.capabilities(&claire, &booking("Claire Dubois")).delete);

        let technician = actor(Role::Technician, "claire", "", "");
        assert!(NameMatchPolicy.capabilities(&technician, &booking("Claire Dubois")).edit);
    }

    #[test]
    fn test_short_designer_field_is_not_a_wildcard() {
        let helene = actor(Role::Designer, "Hélène Martin", "", "");
        assert_eq!(
            NameMatchPolicy.capabilities(&helene, &booking("e")),
            Capabilities::view_only()
        );
        assert!(!NameMatchPolicy.capabilities(&helene, &booking("Ma")).delete);

        // A longer actor name is not contained in a shorter designer field
        let full_name = actor(Role::Technician, "Claire Dubois", "", "");
        assert!(!NameMatchPolicy.capabilities(&full_name, &booking("Claire")).edit);
    }

    #[test]
    fn test_designer_sees_others_without_detail() {
        let paul = actor(Role::Designer, "Paul", "", "");
        let caps = NameMatchPolicy.capabilities(&paul, &booking("Claire"));
        assert_eq!(caps, Capabilities::view_only());
    }

    #[test]
    fn test_empty_designer_field_is_nobodys() {
        let paul = actor(Role::Designer, "Paul", "", "");
        assert!(!NameMatchPolicy.capabilities(&paul, &booking("")).edit);
        let nameless = actor(Role::Designer, "", "", "");
        assert!(!NameMatchPolicy.capabilities(&nameless, &booking("Claire")).edit);
    }

    #[test]
    fn test_user_matches_on_client_name_or_phone() {
        let by_name = actor(Role::User, "Martin", "", "");
        assert!(NameMatchPolicy.capabilities(&by_name, &booking("Claire")).edit);

        let by_phone = actor(Role::User, "M. Martin", "", "0601020304");
        assert!(NameMatchPolicy.capabilities(&by_phone, &booking("Claire")).edit);

        // Client name must match exactly
        let partial = actor(Role::User, "Mart", "", "");
        assert!(!NameMatchPolicy.capabilities(&partial, &booking("Claire")).edit);
    }

    #[test]
    fn test_user_matches_on_designer_field() {
        let by_email = actor(Role::User, "Someone", "claire@atelier.fr", "");
        assert!(NameMatchPolicy
            .capabilities(&by_email, &booking("Claire (claire@atelier.fr)"))
            .edit);

        let stranger = actor(Role::User, "Durand", "durand@mail.fr", "0700000000");
        assert_eq!(
            NameMatchPolicy.capabilities(&stranger, &booking("Claire")),
            Capabilities::view_only()
        );
    }

    #[test]
    fn test_visible_bookings_redacts_others() {
        let paul = actor(Role::Designer, "Paul", "", "");
        let listed = visible_bookings(
            &NameMatchPolicy,
            &paul,
            vec![booking("Claire"), booking("Paul")],
        );
        assert_eq!(listed.len(), 2);
        assert!(listed[0].client_name.is_empty());
        assert_eq!(listed[1].client_name, "Martin");
    }
}
