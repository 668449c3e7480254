// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Complete captures of the mirror.

use crate::binding::{BindingState, Limits};
use crate::state::TrackedState;

/// A complete, self-consistent image of the mirror.
///
/// The [`TrackedState`] half is copied by value. The [`BindingState`] half
/// copies handles by identity: a snapshot refers to context-owned objects but
/// never keeps them alive, so restoring a snapshot whose objects were deleted
/// forwards stale handles to the context.
///
/// # Save/restore hazard
///
/// A snapshot describes what the owning [`StateCache`](crate::StateCache)
/// believed at capture time. If control yields between a save and the matching
/// restore, and something else drives the same native context meanwhile, the
/// mirror silently diverges from reality and the restore is computed against
/// the wrong baseline. Save and restore within one uninterrupted turn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    /// Plain-data state.
    pub state: TrackedState,
    /// Handle bindings.
    pub bindings: BindingState,
}

impl Snapshot {
    /// A snapshot of a freshly created context with the given limits.
    #[must_use]
    pub fn new(limits: Limits) -> Self {
        Self {
            state: TrackedState::default(),
            bindings: BindingState::new(limits),
        }
    }

    /// Copies `source` into `self` in place, reusing allocations.
    pub fn copy_from(&mut self, source: &Self) {
        self.state = source.state;
        self.bindings.copy_from(&source.bindings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{TextureBinding, TextureTarget};
    use crate::gl;
    use crate::handle::{ProgramId, TextureId};

    #[test]
    fn copy_is_independent_of_source() {
        let mut source = Snapshot::default();
        source.state.blend_func = [gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA, gl::ONE, gl::ZERO];
        source.bindings.program = Some(ProgramId(1));
        source.bindings.textures[0] = Some(TextureBinding {
            target: TextureTarget::Texture2d,
            texture: TextureId(3),
        });

        let mut target = Snapshot::default();
        target.copy_from(&source);
        assert_eq!(target, source);

        source.state.blend_func[0] = gl::ONE;
        source.bindings.textures[0] = None;
        assert_eq!(target.state.blend_func[0], gl::SRC_ALPHA);
        assert!(target.bindings.textures[0].is_some());
    }

    #[test]
    fn new_sizes_texture_units() {
        let snap = Snapshot::new(Limits {
            max_draw_buffers: 2,
            max_texture_units: 8,
        });
        assert_eq!(snap.bindings.textures.len(), 8);
    }
}
