/// Cutoff separating foreground (at or below) from background (above).
pub const DEFAULT_THRESHOLD: u8 = 127;

/// How ambiguous pixel corners are resolved while walking a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnPolicy {
    /// Prefer to connect black components.
    Black,
    /// Prefer to connect white components.
    White,
    /// Always take a left turn.
    Left,
    /// Always take a right turn.
    Right,
    /// Prefer the color that is locally less common.
    #[default]
    Minority,
    /// Prefer the color that is locally more common.
    Majority,
}

/// Options controlling thresholding, tracing, and SVG number formatting.
#[derive(Debug, Clone)]
pub struct TraceOptions {
    /// Grayscale samples strictly greater than this value become background.
    pub threshold: u8,
    /// Traced regions with an area at or below this many pixels are dropped.
    pub turd_size: u32,
    pub turn_policy: TurnPolicy,
    /// Smoothness limit; vertices whose alpha reaches it become corners.
    pub alpha_max: f64,
    /// Join adjacent Bézier segments when the result stays within `opt_tolerance`.
    pub opt_curve: bool,
    pub opt_tolerance: f64,
    /// Fixed number of decimals in path data; `None` writes the shortest exact form.
    pub path_precision: Option<u32>,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            turd_size: 2,
            turn_policy: TurnPolicy::Minority,
            alpha_max: 1.0,
            opt_curve: true,
            opt_tolerance: 0.2,
            path_precision: None,
        }
    }
}

impl TraceOptions {
    /// Set the foreground cutoff.
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the speckle area limit.
    pub fn with_turd_size(mut self, turd_size: u32) -> Self {
        self.turd_size = turd_size;
        self
    }

    pub fn with_turn_policy(mut self, turn_policy: TurnPolicy) -> Self {
        self.turn_policy = turn_policy;
        self
    }

    pub fn with_alpha_max(mut self, alpha_max: f64) -> Self {
        self.alpha_max = alpha_max;
        self
    }

    /// Enable or disable curve joining.
    pub fn with_opt_curve(mut self, opt_curve: bool) -> Self {
        self.opt_curve = opt_curve;
        self
    }

    pub fn with_opt_tolerance(mut self, opt_tolerance: f64) -> Self {
        self.opt_tolerance = opt_tolerance;
        self
    }

    /// Set the number of decimals written for coordinates.
    pub fn with_path_precision(mut self, path_precision: Option<u32>) -> Self {
        self.path_precision = path_precision;
        self
    }
}

/// Options for the directory-wide conversion loop.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Extension (without dot, matched case-insensitively) of the images to convert.
    pub extension: String,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            extension: "jpg".to_string(),
        }
    }
}

impl BatchOptions {
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

/// Options for renaming drawings to single letters.
#[derive(Debug, Clone)]
pub struct RenameOptions {
    /// Extension (without dot, matched case-insensitively) of the files to rename.
    pub extension: String,
    /// Names handed out in order; one file per character.
    pub alphabet: Vec<char>,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            extension: "jpg".to_string(),
            alphabet: ('A'..='Z').collect(),
        }
    }
}

impl RenameOptions {
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Replace the sequence of target names.
    pub fn with_alphabet(mut self, alphabet: impl IntoIterator<Item = char>) -> Self {
        self.alphabet = alphabet.into_iter().collect();
        self
    }
}

/// Font-wide settings and the em-box every glyph is fitted into.
#[derive(Debug, Clone)]
pub struct FontOptions {
    /// Family, full, and PostScript name of the generated font.
    pub font_name: String,
    /// Height in font units that every glyph outline is scaled to.
    pub glyph_height: f64,
    /// Blank space added on each side of a glyph.
    pub side_bearing: f64,
    /// Height above the baseline.
    pub ascent: u32,
    /// Depth below the baseline.
    pub descent: u32,
}

impl Default for FontOptions {
    fn default() -> Self {
        Self {
            font_name: "CatFont_".to_string(),
            glyph_height: 700.0,
            side_bearing: 50.0,
            ascent: 800,
            descent: 200,
        }
    }
}

impl FontOptions {
    pub fn with_font_name(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = font_name.into();
        self
    }

    pub fn with_glyph_height(mut self, glyph_height: f64) -> Self {
        self.glyph_height = glyph_height;
        self
    }

    pub fn with_side_bearing(mut self, side_bearing: f64) -> Self {
        self.side_bearing = side_bearing;
        self
    }

    /// Set ascent and descent together.
    pub fn with_vertical_metrics(mut self, ascent: u32, descent: u32) -> Self {
        self.ascent = ascent;
        self.descent = descent;
        self
    }

    /// Size of the em square.
    pub fn units_per_em(&self) -> u32 {
        self.ascent + self.descent
    }
}
