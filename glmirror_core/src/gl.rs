// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! WebGL 2 enum values.
//!
//! Only the values the mirror reads, writes or queries are listed. Mode values
//! (blend factors, compare functions, stencil ops) are passed through to the
//! context uninterpreted, so any valid `GLenum` works even if it is missing
//! here.

#![expect(missing_docs, reason = "names match the WebGL 2 constants")]

/// A raw graphics API enumerant.
pub type GLenum = u32;

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

pub const BLEND: GLenum = 0x0BE2;
pub const CULL_FACE: GLenum = 0x0B44;
pub const DEPTH_TEST: GLenum = 0x0B71;
pub const DITHER: GLenum = 0x0BD0;
pub const POLYGON_OFFSET_FILL: GLenum = 0x8037;
pub const SAMPLE_ALPHA_TO_COVERAGE: GLenum = 0x809E;
pub const SAMPLE_COVERAGE: GLenum = 0x80A0;
pub const SCISSOR_TEST: GLenum = 0x0C11;
pub const STENCIL_TEST: GLenum = 0x0B90;
pub const RASTERIZER_DISCARD: GLenum = 0x8C89;

// ---------------------------------------------------------------------------
// Pixel store
// ---------------------------------------------------------------------------

pub const PACK_ALIGNMENT: GLenum = 0x0D05;
pub const UNPACK_ALIGNMENT: GLenum = 0x0CF5;
pub const UNPACK_FLIP_Y_WEBGL: GLenum = 0x9240;
pub const UNPACK_PREMULTIPLY_ALPHA_WEBGL: GLenum = 0x9241;
pub const UNPACK_COLORSPACE_CONVERSION_WEBGL: GLenum = 0x9243;
pub const BROWSER_DEFAULT_WEBGL: GLenum = 0x9244;
pub const UNPACK_ROW_LENGTH: GLenum = 0x0CF2;
pub const UNPACK_SKIP_ROWS: GLenum = 0x0CF3;
pub const UNPACK_SKIP_PIXELS: GLenum = 0x0CF4;
pub const PACK_ROW_LENGTH: GLenum = 0x0D02;
pub const PACK_SKIP_ROWS: GLenum = 0x0D03;
pub const PACK_SKIP_PIXELS: GLenum = 0x0D04;

// ---------------------------------------------------------------------------
// Parameter names
// ---------------------------------------------------------------------------

pub const ACTIVE_TEXTURE: GLenum = 0x84E0;
pub const VIEWPORT: GLenum = 0x0BA2;
pub const SCISSOR_BOX: GLenum = 0x0C10;
pub const BLEND_COLOR: GLenum = 0x8005;
pub const BLEND_EQUATION_RGB: GLenum = 0x8009;
pub const BLEND_EQUATION_ALPHA: GLenum = 0x883D;
pub const BLEND_SRC_RGB: GLenum = 0x80C9;
pub const BLEND_DST_RGB: GLenum = 0x80C8;
pub const BLEND_SRC_ALPHA: GLenum = 0x80CB;
pub const BLEND_DST_ALPHA: GLenum = 0x80CA;
pub const CULL_FACE_MODE: GLenum = 0x0B45;
pub const FRONT_FACE: GLenum = 0x0B46;
pub const DEPTH_FUNC: GLenum = 0x0B74;
pub const LINE_WIDTH: GLenum = 0x0B21;
pub const COLOR_CLEAR_VALUE: GLenum = 0x0C22;
pub const COLOR_WRITEMASK: GLenum = 0x0C23;
pub const DEPTH_CLEAR_VALUE: GLenum = 0x0B73;
pub const DEPTH_WRITEMASK: GLenum = 0x0B72;
pub const DEPTH_RANGE: GLenum = 0x0B70;
pub const POLYGON_OFFSET_FACTOR: GLenum = 0x8038;
pub const POLYGON_OFFSET_UNITS: GLenum = 0x2A00;
pub const SAMPLE_COVERAGE_VALUE: GLenum = 0x80AA;
pub const SAMPLE_COVERAGE_INVERT: GLenum = 0x80AB;
pub const STENCIL_FUNC: GLenum = 0x0B92;
pub const STENCIL_REF: GLenum = 0x0B97;
pub const STENCIL_VALUE_MASK: GLenum = 0x0B93;
pub const STENCIL_FAIL: GLenum = 0x0B94;
pub const STENCIL_PASS_DEPTH_FAIL: GLenum = 0x0B95;
pub const STENCIL_PASS_DEPTH_PASS: GLenum = 0x0B96;
pub const STENCIL_WRITEMASK: GLenum = 0x0B98;
pub const STENCIL_CLEAR_VALUE: GLenum = 0x0B91;
pub const STENCIL_BACK_FUNC: GLenum = 0x8800;
pub const STENCIL_BACK_FAIL: GLenum = 0x8801;
pub const STENCIL_BACK_PASS_DEPTH_FAIL: GLenum = 0x8802;
pub const STENCIL_BACK_PASS_DEPTH_PASS: GLenum = 0x8803;
pub const STENCIL_BACK_REF: GLenum = 0x8CA3;
pub const STENCIL_BACK_VALUE_MASK: GLenum = 0x8CA4;
pub const STENCIL_BACK_WRITEMASK: GLenum = 0x8CA5;
pub const CURRENT_PROGRAM: GLenum = 0x8B8D;
pub const ARRAY_BUFFER_BINDING: GLenum = 0x8894;
pub const ELEMENT_ARRAY_BUFFER_BINDING: GLenum = 0x8895;
pub const UNIFORM_BUFFER_BINDING: GLenum = 0x8A28;
pub const VERTEX_ARRAY_BINDING: GLenum = 0x85B5;
pub const FRAMEBUFFER_BINDING: GLenum = 0x8CA6;
pub const DRAW_FRAMEBUFFER_BINDING: GLenum = 0x8CA6;
pub const READ_FRAMEBUFFER_BINDING: GLenum = 0x8CAA;
pub const READ_BUFFER: GLenum = 0x0C02;
pub const DRAW_BUFFER0: GLenum = 0x8825;
pub const MAX_DRAW_BUFFERS: GLenum = 0x8824;
pub const MAX_TEXTURE_IMAGE_UNITS: GLenum = 0x8872;
pub const TEXTURE_BINDING_2D: GLenum = 0x8069;
pub const TEXTURE_BINDING_CUBE_MAP: GLenum = 0x8514;
pub const TEXTURE_BINDING_3D: GLenum = 0x806A;
pub const TEXTURE_BINDING_2D_ARRAY: GLenum = 0x8C1D;

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

pub const ARRAY_BUFFER: GLenum = 0x8892;
pub const ELEMENT_ARRAY_BUFFER: GLenum = 0x8893;
pub const UNIFORM_BUFFER: GLenum = 0x8A11;
pub const FRAMEBUFFER: GLenum = 0x8D40;
pub const READ_FRAMEBUFFER: GLenum = 0x8CA8;
pub const DRAW_FRAMEBUFFER: GLenum = 0x8CA9;
pub const TEXTURE_2D: GLenum = 0x0DE1;
pub const TEXTURE_CUBE_MAP: GLenum = 0x8513;
pub const TEXTURE_3D: GLenum = 0x806F;
pub const TEXTURE_2D_ARRAY: GLenum = 0x8C1A;

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

pub const NONE: GLenum = 0;
pub const ZERO: GLenum = 0;
pub const ONE: GLenum = 1;
pub const TEXTURE0: GLenum = 0x84C0;
pub const COLOR_ATTACHMENT0: GLenum = 0x8CE0;
pub const FRONT: GLenum = 0x0404;
pub const BACK: GLenum = 0x0405;
pub const FRONT_AND_BACK: GLenum = 0x0408;
pub const CW: GLenum = 0x0900;
pub const CCW: GLenum = 0x0901;
pub const FUNC_ADD: GLenum = 0x8006;
pub const NEVER: GLenum = 0x0200;
pub const LESS: GLenum = 0x0201;
pub const EQUAL: GLenum = 0x0202;
pub const ALWAYS: GLenum = 0x0207;
pub const KEEP: GLenum = 0x1E00;
pub const REPLACE: GLenum = 0x1E01;
pub const INCR: GLenum = 0x1E02;
pub const SRC_ALPHA: GLenum = 0x0302;
pub const ONE_MINUS_SRC_ALPHA: GLenum = 0x0303;
