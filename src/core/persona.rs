//! The fixed persona roster.
//!
//! The backend keys its prompt table on the display names below; the
//! client sends `display_name` as the `character` field of every chat
//! request. Selection accepts either the id or the display name,
//! case-insensitively.

/// A selectable character persona.
#[derive(Debug, PartialEq, Eq)]
pub struct Persona {
    pub id: &'static str,
    pub display_name: &'static str,
}

const PERSONAS: &[Persona] = &[
    Persona {
        id: "iron-man",
        display_name: "Iron Man",
    },
    Persona {
        id: "yoda",
        display_name: "Yoda",
    },
    Persona {
        id: "joker",
        display_name: "Joker",
    },
    Persona {
        id: "harry-potter",
        display_name: "Harry Potter",
    },
    Persona {
        id: "baburao",
        display_name: "Baburao",
    },
];

pub fn all_personas() -> &'static [Persona] {
    PERSONAS
}

/// The persona used when neither the CLI nor the config names one.
pub fn default_persona() -> &'static Persona {
    &PERSONAS[0]
}

pub fn find_persona(name: &str) -> Option<&'static Persona> {
    PERSONAS.iter().find(|p| {
        p.id.eq_ignore_ascii_case(name) || p.display_name.eq_ignore_ascii_case(name)
    })
}

/// Resolve a user-supplied persona name, or explain what would have
/// worked.
pub fn resolve_persona(name: &str) -> Result<&'static Persona, String> {
    find_persona(name).ok_or_else(|| {
        let available: Vec<&str> = PERSONAS.iter().map(|p| p.id).collect();
        format!(
            "Persona '{}' not found. Available personas: {}",
            name,
            available.join(", ")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_is_non_empty_and_first_is_default() {
        assert!(!all_personas().is_empty());
        assert_eq!(default_persona().id, all_personas()[0].id);
    }

    #[test]
    fn lookup_accepts_id_and_display_name() {
        assert_eq!(find_persona("yoda").unwrap().display_name, "Yoda");
        assert_eq!(find_persona("Harry Potter").unwrap().id, "harry-potter");
        assert_eq!(find_persona("IRON-MAN").unwrap().display_name, "Iron Man");
    }

    #[test]
    fn unknown_names_list_the_roster() {
        let err = resolve_persona("gandalf").unwrap_err();
        assert!(err.contains("Persona 'gandalf' not found"));
        assert!(err.contains("iron-man"));
        assert!(err.contains("baburao"));
    }
}
