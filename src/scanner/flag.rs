/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use bitflags::bitflags;

/// The only flag set ever constructed. This crate's scanner
/// always runs against a single, already fully buffered and
/// already-transcoded slice (see `reader::encoding`), so
/// there is no extendable/lazy mode to select between: every
/// scalar is scanned eagerly and the whole token stream is
/// produced in one synchronous call.
pub const O_ZEROED: Flags = Flags::empty();

bitflags! {
    /// Placeholder flag set threaded through the scanner's
    /// internal functions. Currently carries no bits; kept as
    /// a type (rather than removed outright) because a large
    /// fraction of the scanner's internal API takes `opts:
    /// Flags` and may grow real options again (e.g. a future
    /// `O_YAML_1_1_COMPAT` toggle) without reshaping every
    /// call site.
    #[derive(Default)]
    pub struct Flags: u32 {
    }
}
