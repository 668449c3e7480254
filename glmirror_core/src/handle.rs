// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Opaque handles for context-owned objects.
//!
//! Handles are assigned by the backend and only ever compared by identity.
//! The cache never creates, dereferences or destroys the objects they name.
//! "Nothing bound" is spelled `None` wherever a handle is optional.
//!
//! With the `serde` feature handles serialize as their raw number, which is
//! only meaningful inside the process that assigned them.

use core::fmt;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(transparent)
        )]
        pub struct $name(pub u32);

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

handle! {
    /// A linked shader program.
    ProgramId
}

handle! {
    /// A buffer object (vertex, index or uniform data).
    BufferId
}

handle! {
    /// A vertex array object.
    VertexArrayId
}

handle! {
    /// A framebuffer object. The default framebuffer is `None`.
    FramebufferId
}

handle! {
    /// A texture object of any dimensionality.
    TextureId
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn debug_names_the_kind() {
        assert_eq!(format!("{:?}", FramebufferId(7)), "FramebufferId(7)");
        assert_eq!(format!("{:?}", Some(TextureId(2))), "Some(TextureId(2))");
    }

    #[test]
    fn equality_is_identity() {
        assert_eq!(BufferId(3), BufferId(3));
        assert_ne!(BufferId(3), BufferId(4));
    }
}
