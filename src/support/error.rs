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

use thiserror::Error;

use crate::mime::AggregatorState;

#[derive(Error, Debug)]
pub enum Error {
    /// The operation is not permitted in the aggregator's current state. The
    /// caller must start a new message before continuing.
    #[error("{operation} is not valid while {state:?}")]
    InvalidState {
        operation: &'static str,
        state: AggregatorState,
    },
    /// A single header field was unusable. The aggregator logs and drops
    /// these itself; they never reach the caller of `on_header`.
    #[error("Malformed header field: {0}")]
    MalformedField(String),
    #[error(transparent)]
    Config(#[from] toml::de::Error),
}

/// A listener failed while being notified.
///
/// Failures are isolated per listener; the registry reports them and moves
/// on to the next one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Listener {index} failed in {method}: {message}")]
pub struct ListenerInvocationError {
    pub method: &'static str,
    /// Position of the failing listener in registration order.
    pub index: usize,
    pub message: String,
}
