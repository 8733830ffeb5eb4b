/// Stabilizing term added to every normalized-difference denominator.
pub const NDI_EPSILON: f32 = 1e-10;

/// Largest 8-bit display level.
pub const MAX_LEVEL: f32 = 255.0;

/// Uniform level emitted by min-max scaling when the input range is empty.
pub const DEGENERATE_MID_LEVEL: u8 = 128;

/// Opaque alpha value.
pub const ALPHA_OPAQUE: u8 = 255;

/// Transparent alpha value.
pub const ALPHA_TRANSPARENT: u8 = 0;

/// Default index cutoff below which RGBA pixels are opaque.
pub const DEFAULT_ALPHA_CUTOFF: f32 = 0.5;

/// Number of channels in an RGB composite.
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Number of channels in an RGBA composite.
pub const RGBA_CHANNEL_COUNT: usize = 4;

/// JPEG quality used for gray and RGB products.
pub const JPEG_QUALITY: u8 = 95;

/// Default directory for image products.
pub const DEFAULT_OUTPUT_DIR: &str = "products";

/// Default ledger file name.
pub const DEFAULT_LEDGER_FILE: &str = "metadata.txt";
