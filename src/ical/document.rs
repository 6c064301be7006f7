//-
// Copyright (c) 2026, Jason Lingle
//
// This file is part of Hdrfold.
//
// Hdrfold is free software: you can  redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option)
// any later version.
//
// Hdrfold is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without  even the implied  warranty of MERCHANTABILITY  or FITNESS
// FOR  A PARTICULAR  PURPOSE.  See the  GNU General  Public  License for  more
// details.
//
// You should have received a copy of the GNU General Public License along with
// Hdrfold. If not, see <http://www.gnu.org/licenses/>.

use serde::{Deserialize, Serialize};

/// A node of an iCalendar-style document, e.g. a `VEVENT` inside a
/// `VCALENDAR`.
///
/// Property and child order is retained as given, though content comparison
/// does not depend on it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// The component type, e.g. `VEVENT`.
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Component>,
}

/// A single property line, e.g. `ATTENDEE;CN=Bob:mailto:bob@example.com`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    /// `(name, value)` parameter pairs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<(String, String)>,
    /// The value in its serialised iCalendar form.
    pub value: String,
}

impl Component {
    pub fn new(kind: impl Into<String>) -> Self {
        Component {
            kind: kind.into(),
            properties: vec![],
            children: vec![],
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_child(mut self, child: Component) -> Self {
        self.children.push(child);
        self
    }

    /// Return the first property with the given name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.name == name)
    }
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Property {
            name: name.into(),
            params: vec![],
            value: value.into(),
        }
    }

    pub fn with_param(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn property_lookup() {
        let mut event = Component::new("VEVENT")
            .with_property(Property::new("UID", "1"))
            .with_property(Property::new("ATTENDEE", "mailto:a@x"))
            .with_property(Property::new("ATTENDEE", "mailto:b@x"));

        assert_eq!("1", event.property("UID").unwrap().value);
        assert_eq!("mailto:a@x", event.property("ATTENDEE").unwrap().value);
        assert!(event.property("SUMMARY").is_none());

        event.property_mut("UID").unwrap().value = "2".to_owned();
        assert_eq!("2", event.property("UID").unwrap().value);
    }

    #[test]
    fn loads_from_toml_fixture() {
        let calendar: Component = toml::from_str(
            r#"
kind = "VCALENDAR"

[[children]]
kind = "VEVENT"

[[children.properties]]
name = "UID"
value = "abc-123"

[[children.properties]]
name = "ATTENDEE"
params = [["CN", "Bob"], ["PARTSTAT", "ACCEPTED"]]
value = "mailto:bob@example.com"
"#,
        )
        .unwrap();

        let expected = Component::new("VCALENDAR").with_child(
            Component::new("VEVENT")
                .with_property(Property::new("UID", "abc-123"))
                .with_property(
                    Property::new("ATTENDEE", "mailto:bob@example.com")
                        .with_param("CN", "Bob")
                        .with_param("PARTSTAT", "ACCEPTED"),
                ),
        );
        assert_eq!(expected, calendar);

        let text = toml::to_string(&calendar).unwrap();
        assert_eq!(calendar, toml::from_str::<Component>(&text).unwrap());
    }
}
