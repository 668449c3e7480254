// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plain-data half of the state mirror.
//!
//! [`TrackedState`] holds the last-known value of every tracked parameter that
//! is not a handle: capability toggles, pixel-store parameters and the
//! fixed-function scalars and vectors. It is `Copy`, compares element-wise
//! with `==`, and (with the `serde` feature) serializes as plain structured
//! data.
//!
//! Key sets the cache has to enumerate ([`Capability`], [`PixelStoreParam`],
//! [`Face`]) are closed enums. Mode values such as blend factors or compare
//! functions stay raw [`GLenum`]s and are passed through uninterpreted.

use crate::gl::{self, GLenum};

// ---------------------------------------------------------------------------
// Key enums
// ---------------------------------------------------------------------------

/// A binary pipeline toggle controlled by `enable` / `disable`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Capability {
    /// `BLEND`
    Blend,
    /// `CULL_FACE`
    CullFace,
    /// `DEPTH_TEST`
    DepthTest,
    /// `DITHER`
    Dither,
    /// `POLYGON_OFFSET_FILL`
    PolygonOffsetFill,
    /// `SAMPLE_ALPHA_TO_COVERAGE`
    SampleAlphaToCoverage,
    /// `SAMPLE_COVERAGE`
    SampleCoverage,
    /// `SCISSOR_TEST`
    ScissorTest,
    /// `STENCIL_TEST`
    StencilTest,
    /// `RASTERIZER_DISCARD`
    RasterizerDiscard,
}

impl Capability {
    /// Every tracked capability, in restore order.
    pub const ALL: [Self; 10] = [
        Self::Blend,
        Self::CullFace,
        Self::DepthTest,
        Self::Dither,
        Self::PolygonOffsetFill,
        Self::SampleAlphaToCoverage,
        Self::SampleCoverage,
        Self::ScissorTest,
        Self::StencilTest,
        Self::RasterizerDiscard,
    ];

    /// Returns the `GLenum` passed to `enable` / `disable`.
    #[must_use]
    pub const fn to_gl(self) -> GLenum {
        match self {
            Self::Blend => gl::BLEND,
            Self::CullFace => gl::CULL_FACE,
            Self::DepthTest => gl::DEPTH_TEST,
            Self::Dither => gl::DITHER,
            Self::PolygonOffsetFill => gl::POLYGON_OFFSET_FILL,
            Self::SampleAlphaToCoverage => gl::SAMPLE_ALPHA_TO_COVERAGE,
            Self::SampleCoverage => gl::SAMPLE_COVERAGE,
            Self::ScissorTest => gl::SCISSOR_TEST,
            Self::StencilTest => gl::STENCIL_TEST,
            Self::RasterizerDiscard => gl::RASTERIZER_DISCARD,
        }
    }

    /// Maps a raw `GLenum` back to a tracked capability.
    #[must_use]
    pub fn from_gl(value: GLenum) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.to_gl() == value)
    }
}

/// A pixel-transfer parameter set with `pixelStorei`.
///
/// Boolean parameters (flip-Y, premultiply-alpha) are stored as `0` / `1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum PixelStoreParam {
    /// `PACK_ALIGNMENT`
    PackAlignment,
    /// `UNPACK_ALIGNMENT`
    UnpackAlignment,
    /// `UNPACK_FLIP_Y_WEBGL`
    UnpackFlipY,
    /// `UNPACK_PREMULTIPLY_ALPHA_WEBGL`
    UnpackPremultiplyAlpha,
    /// `UNPACK_COLORSPACE_CONVERSION_WEBGL`
    UnpackColorspaceConversion,
    /// `UNPACK_ROW_LENGTH`
    UnpackRowLength,
    /// `UNPACK_SKIP_ROWS`
    UnpackSkipRows,
    /// `UNPACK_SKIP_PIXELS`
    UnpackSkipPixels,
    /// `PACK_ROW_LENGTH`
    PackRowLength,
    /// `PACK_SKIP_PIXELS`
    PackSkipPixels,
    /// `PACK_SKIP_ROWS`
    PackSkipRows,
}

impl PixelStoreParam {
    /// Every tracked pixel-store parameter, in restore order.
    pub const ALL: [Self; 11] = [
        Self::PackAlignment,
        Self::UnpackAlignment,
        Self::UnpackFlipY,
        Self::UnpackPremultiplyAlpha,
        Self::UnpackColorspaceConversion,
        Self::UnpackRowLength,
        Self::UnpackSkipRows,
        Self::UnpackSkipPixels,
        Self::PackRowLength,
        Self::PackSkipPixels,
        Self::PackSkipRows,
    ];

    /// Returns the `GLenum` passed to `pixelStorei`.
    #[must_use]
    pub const fn to_gl(self) -> GLenum {
        match self {
            Self::PackAlignment => gl::PACK_ALIGNMENT,
            Self::UnpackAlignment => gl::UNPACK_ALIGNMENT,
            Self::UnpackFlipY => gl::UNPACK_FLIP_Y_WEBGL,
            Self::UnpackPremultiplyAlpha => gl::UNPACK_PREMULTIPLY_ALPHA_WEBGL,
            Self::UnpackColorspaceConversion => gl::UNPACK_COLORSPACE_CONVERSION_WEBGL,
            Self::UnpackRowLength => gl::UNPACK_ROW_LENGTH,
            Self::UnpackSkipRows => gl::UNPACK_SKIP_ROWS,
            Self::UnpackSkipPixels => gl::UNPACK_SKIP_PIXELS,
            Self::PackRowLength => gl::PACK_ROW_LENGTH,
            Self::PackSkipPixels => gl::PACK_SKIP_PIXELS,
            Self::PackSkipRows => gl::PACK_SKIP_ROWS,
        }
    }

    /// Returns `true` for the parameters WebGL reports as booleans.
    #[must_use]
    pub const fn is_boolean(self) -> bool {
        matches!(self, Self::UnpackFlipY | Self::UnpackPremultiplyAlpha)
    }

    /// Maps a raw `GLenum` back to a tracked parameter.
    #[must_use]
    pub fn from_gl(value: GLenum) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.to_gl() == value)
    }
}

/// Face selector for the separate stencil setters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Face {
    /// `FRONT`
    Front,
    /// `BACK`
    Back,
    /// `FRONT_AND_BACK`
    FrontAndBack,
}

impl Face {
    /// Returns the raw `GLenum`.
    #[must_use]
    pub const fn to_gl(self) -> GLenum {
        match self {
            Self::Front => gl::FRONT,
            Self::Back => gl::BACK,
            Self::FrontAndBack => gl::FRONT_AND_BACK,
        }
    }

    /// Whether the selector covers the front face.
    #[must_use]
    pub const fn front(self) -> bool {
        matches!(self, Self::Front | Self::FrontAndBack)
    }

    /// Whether the selector covers the back face.
    #[must_use]
    pub const fn back(self) -> bool {
        matches!(self, Self::Back | Self::FrontAndBack)
    }
}

// ---------------------------------------------------------------------------
// Keyed field sets
// ---------------------------------------------------------------------------

macro_rules! keyed_fields {
    (
        $(#[$meta:meta])*
        pub struct $name:ident: $key:ident => $ty:ty {
            $($(#[$fmeta:meta])* $field:ident: $variant:ident,)*
        }
    ) => {
        $(#[$meta])*
        pub struct $name {
            $($(#[$fmeta])* pub $field: $ty,)*
        }

        impl $name {
            /// Returns the value for `key`.
            #[must_use]
            pub const fn get(&self, key: $key) -> $ty {
                match key {
                    $($key::$variant => self.$field,)*
                }
            }

            /// Returns a mutable reference to the value for `key`.
            pub fn get_mut(&mut self, key: $key) -> &mut $ty {
                match key {
                    $($key::$variant => &mut self.$field,)*
                }
            }

            /// Iterates over every key and its value, in key order.
            pub fn iter(&self) -> impl Iterator<Item = ($key, $ty)> + '_ {
                $key::ALL.into_iter().map(|k| (k, self.get(k)))
            }
        }
    };
}

keyed_fields! {
    /// Enabled state of every [`Capability`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CapabilityFlags: Capability => bool {
        /// `BLEND`
        blend: Blend,
        /// `CULL_FACE`
        cull_face: CullFace,
        /// `DEPTH_TEST`
        depth_test: DepthTest,
        /// `DITHER`
        dither: Dither,
        /// `POLYGON_OFFSET_FILL`
        polygon_offset_fill: PolygonOffsetFill,
        /// `SAMPLE_ALPHA_TO_COVERAGE`
        sample_alpha_to_coverage: SampleAlphaToCoverage,
        /// `SAMPLE_COVERAGE`
        sample_coverage: SampleCoverage,
        /// `SCISSOR_TEST`
        scissor_test: ScissorTest,
        /// `STENCIL_TEST`
        stencil_test: StencilTest,
        /// `RASTERIZER_DISCARD`
        rasterizer_discard: RasterizerDiscard,
    }
}

impl Default for CapabilityFlags {
    /// Everything off except dithering.
    fn default() -> Self {
        Self {
            blend: false,
            cull_face: false,
            depth_test: false,
            dither: true,
            polygon_offset_fill: false,
            sample_alpha_to_coverage: false,
            sample_coverage: false,
            scissor_test: false,
            stencil_test: false,
            rasterizer_discard: false,
        }
    }
}

keyed_fields! {
    /// Value of every [`PixelStoreParam`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PixelStore: PixelStoreParam => i32 {
        /// `PACK_ALIGNMENT`
        pack_alignment: PackAlignment,
        /// `UNPACK_ALIGNMENT`
        unpack_alignment: UnpackAlignment,
        /// `UNPACK_FLIP_Y_WEBGL`, `0` or `1`.
        unpack_flip_y: UnpackFlipY,
        /// `UNPACK_PREMULTIPLY_ALPHA_WEBGL`, `0` or `1`.
        unpack_premultiply_alpha: UnpackPremultiplyAlpha,
        /// `UNPACK_COLORSPACE_CONVERSION_WEBGL`
        unpack_colorspace_conversion: UnpackColorspaceConversion,
        /// `UNPACK_ROW_LENGTH`
        unpack_row_length: UnpackRowLength,
        /// `UNPACK_SKIP_ROWS`
        unpack_skip_rows: UnpackSkipRows,
        /// `UNPACK_SKIP_PIXELS`
        unpack_skip_pixels: UnpackSkipPixels,
        /// `PACK_ROW_LENGTH`
        pack_row_length: PackRowLength,
        /// `PACK_SKIP_PIXELS`
        pack_skip_pixels: PackSkipPixels,
        /// `PACK_SKIP_ROWS`
        pack_skip_rows: PackSkipRows,
    }
}

impl Default for PixelStore {
    fn default() -> Self {
        Self {
            pack_alignment: 4,
            unpack_alignment: 4,
            unpack_flip_y: 0,
            unpack_premultiply_alpha: 0,
            unpack_colorspace_conversion: gl::BROWSER_DEFAULT_WEBGL as i32,
            unpack_row_length: 0,
            unpack_skip_rows: 0,
            unpack_skip_pixels: 0,
            pack_row_length: 0,
            pack_skip_pixels: 0,
            pack_skip_rows: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Compound fields
// ---------------------------------------------------------------------------

/// `sampleCoverage(value, invert)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleCoverage {
    /// Coverage value in `[0, 1]`.
    pub value: f32,
    /// Whether the coverage mask is inverted.
    pub invert: bool,
}

/// `stencilFunc(func, ref, mask)` for one face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StencilFunc {
    /// Compare function.
    pub func: GLenum,
    /// Reference value.
    pub reference: i32,
    /// Mask applied to both reference and stored value.
    pub mask: u32,
}

/// `stencilOp(fail, zfail, zpass)` for one face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StencilOp {
    /// Action when the stencil test fails.
    pub fail: GLenum,
    /// Action when the stencil test passes and the depth test fails.
    pub depth_fail: GLenum,
    /// Action when both tests pass.
    pub depth_pass: GLenum,
}

/// Complete stencil configuration of one face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StencilFace {
    /// Compare function, reference and mask.
    pub func: StencilFunc,
    /// Update actions.
    pub op: StencilOp,
    /// Write mask.
    pub write_mask: u32,
}

impl Default for StencilFace {
    fn default() -> Self {
        Self {
            func: StencilFunc {
                func: gl::ALWAYS,
                reference: 0,
                mask: u32::MAX,
            },
            op: StencilOp {
                fail: gl::KEEP,
                depth_fail: gl::KEEP,
                depth_pass: gl::KEEP,
            },
            write_mask: u32::MAX,
        }
    }
}

// ---------------------------------------------------------------------------
// TrackedState
// ---------------------------------------------------------------------------

/// Last-known value of every tracked non-handle parameter.
///
/// Fixed-arity fields never change shape. Equality is element-wise value
/// equality; two floats are equal only if `==` says so, which means a `NaN`
/// never matches and is always forwarded.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackedState {
    /// Capability toggles.
    pub capabilities: CapabilityFlags,
    /// Pixel-transfer parameters.
    pub pixel_store: PixelStore,
    /// Active texture unit as `TEXTURE0 + unit`.
    pub active_texture: GLenum,
    /// `viewport(x, y, width, height)`.
    pub viewport: [i32; 4],
    /// `blendColor(r, g, b, a)`.
    pub blend_color: [f32; 4],
    /// Blend equation: rgb, alpha.
    pub blend_equation: [GLenum; 2],
    /// Blend factors: src rgb, dst rgb, src alpha, dst alpha.
    pub blend_func: [GLenum; 4],
    /// `cullFace(mode)`.
    pub cull_face: GLenum,
    /// `frontFace(mode)`.
    pub front_face: GLenum,
    /// `depthFunc(func)`.
    pub depth_func: GLenum,
    /// `lineWidth(width)`.
    pub line_width: f32,
    /// `clearColor(r, g, b, a)`.
    pub clear_color: [f32; 4],
    /// `colorMask(r, g, b, a)`.
    pub color_mask: [bool; 4],
    /// `clearDepth(depth)`.
    pub clear_depth: f32,
    /// `depthMask(flag)`.
    pub depth_mask: bool,
    /// `depthRange(near, far)`.
    pub depth_range: [f32; 2],
    /// `polygonOffset(factor, units)`.
    pub polygon_offset: [f32; 2],
    /// `sampleCoverage(value, invert)`.
    pub sample_coverage: SampleCoverage,
    /// `scissor(x, y, width, height)`.
    pub scissor: [i32; 4],
    /// Front-face stencil state.
    pub stencil_front: StencilFace,
    /// Back-face stencil state.
    pub stencil_back: StencilFace,
    /// `clearStencil(s)`.
    pub clear_stencil: i32,
}

impl TrackedState {
    /// Returns `true` if `cap` is enabled.
    #[must_use]
    pub const fn is_enabled(&self, cap: Capability) -> bool {
        self.capabilities.get(cap)
    }

    /// Returns the index of the active texture unit.
    #[must_use]
    pub const fn active_unit(&self) -> u32 {
        self.active_texture.saturating_sub(gl::TEXTURE0)
    }
}

impl Default for TrackedState {
    /// The state of a freshly created context.
    ///
    /// Viewport and scissor depend on the drawing surface and start zeroed.
    fn default() -> Self {
        Self {
            capabilities: CapabilityFlags::default(),
            pixel_store: PixelStore::default(),
            active_texture: gl::TEXTURE0,
            viewport: [0; 4],
            blend_color: [0.0; 4],
            blend_equation: [gl::FUNC_ADD; 2],
            blend_func: [gl::ONE, gl::ZERO, gl::ONE, gl::ZERO],
            cull_face: gl::BACK,
            front_face: gl::CCW,
            depth_func: gl::LESS,
            line_width: 1.0,
            clear_color: [0.0; 4],
            color_mask: [true; 4],
            clear_depth: 1.0,
            depth_mask: true,
            depth_range: [0.0, 1.0],
            polygon_offset: [0.0; 2],
            sample_coverage: SampleCoverage {
                value: 1.0,
                invert: false,
            },
            scissor: [0; 4],
            stencil_front: StencilFace::default(),
            stencil_back: StencilFace::default(),
            clear_stencil: 0,
        }
    }
}
