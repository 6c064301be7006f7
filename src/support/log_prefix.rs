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

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Tracks text that should be included in at the start of every log statement.
///
/// Clones of a `LogPrefix` share the same underlying data.
#[derive(Clone)]
pub struct LogPrefix {
    inner: Rc<RefCell<Inner>>,
}

#[derive(Clone)]
struct Inner {
    component: String,
    message_id: Option<String>,
}

impl LogPrefix {
    pub fn new(component: String) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                component: sanitise(component),
                message_id: None,
            })),
        }
    }

    pub fn deep_clone(&self) -> Self {
        let inner = self.inner.borrow();
        Self {
            inner: Rc::new(RefCell::new(Inner::clone(&inner))),
        }
    }

    pub fn set_message_id(&self, message_id: String) {
        self.inner.borrow_mut().message_id = Some(sanitise(message_id));
    }

    pub fn clear_message(&self) {
        self.inner.borrow_mut().message_id = None;
    }
}

impl fmt::Debug for LogPrefix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LogPrefix({})", self)
    }
}

impl fmt::Display for LogPrefix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let inner = self.inner.borrow();
        write!(f, "{}", inner.component)?;
        if let Some(ref message_id) = inner.message_id {
            write!(f, "[{message_id}]")?;
        }

        Ok(())
    }
}

fn sanitise(mut s: String) -> String {
    s.retain(|c| !c.is_control());
    let trimmed = s.trim();
    if trimmed.len() != s.len() {
        s = trimmed.to_owned();
    }
    if let Some((truncate_len, _)) = s.char_indices().nth(64) {
        s.truncate(truncate_len);
    }

    s
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn formatting() {
        let prefix = LogPrefix::new("headers".to_owned());
        assert_eq!("headers", prefix.to_string());

        let shared = prefix.clone();
        let detached = prefix.deep_clone();
        shared.set_message_id(" <abc@example.com>\r\n".to_owned());
        assert_eq!("headers[<abc@example.com>]", prefix.to_string());
        assert_eq!("headers", detached.to_string());

        prefix.clear_message();
        assert_eq!("headers", shared.to_string());
    }

    #[test]
    fn long_values_are_truncated() {
        let prefix = LogPrefix::new("headers".to_owned());
        prefix.set_message_id("x".repeat(100));
        assert_eq!(format!("headers[{}]", "x".repeat(64)), prefix.to_string());
    }
}
