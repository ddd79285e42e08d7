use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Named palettes
// ---------------------------------------------------------------------------

/// Palette families offered on the "Learn More" page. Each is a fixed
/// saturation/lightness pair; hues are spread evenly around the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteKind {
    #[default]
    Pastel,
    Colorblind,
    Bright,
    Muted,
    Deep,
    Dark,
}

impl PaletteKind {
    pub const ALL: [PaletteKind; 6] = [
        PaletteKind::Pastel,
        PaletteKind::Colorblind,
        PaletteKind::Bright,
        PaletteKind::Muted,
        PaletteKind::Deep,
        PaletteKind::Dark,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PaletteKind::Pastel => "Pastel",
            PaletteKind::Colorblind => "Colorblind",
            PaletteKind::Bright => "Bright",
            PaletteKind::Muted => "Muted",
            PaletteKind::Deep => "Deep",
            PaletteKind::Dark => "Dark",
        }
    }

    fn saturation_lightness(self) -> (f32, f32) {
        match self {
            PaletteKind::Pastel => (0.70, 0.80),
            PaletteKind::Colorblind => (0.85, 0.45),
            PaletteKind::Bright => (1.00, 0.50),
            PaletteKind::Muted => (0.40, 0.55),
            PaletteKind::Deep => (0.65, 0.40),
            PaletteKind::Dark => (0.80, 0.25),
        }
    }
}

/// First hue of every palette, so a one-colour palette is blue.
const BASE_HUE: f32 = 210.0;

/// Generates `n` visually distinct colours from `kind` using evenly spaced hues.
pub fn generate_palette(kind: PaletteKind, n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    let (saturation, lightness) = kind.saturation_lightness();
    (0..n)
        .map(|i| {
            let hue = (BASE_HUE + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, saturation, lightness);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Single colour used by histogram, bar and scatter charts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SingleColor {
    /// First colour of the selected palette.
    #[default]
    PaletteBlue,
    Cyan,
    Blue,
    Green,
    Red,
    Magenta,
    Yellow,
    Black,
    Custom,
}

impl SingleColor {
    pub const ALL: [SingleColor; 9] = [
        SingleColor::PaletteBlue,
        SingleColor::Cyan,
        SingleColor::Blue,
        SingleColor::Green,
        SingleColor::Red,
        SingleColor::Magenta,
        SingleColor::Yellow,
        SingleColor::Black,
        SingleColor::Custom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SingleColor::PaletteBlue => "Palette Blue",
            SingleColor::Cyan => "Cyan",
            SingleColor::Blue => "Blue",
            SingleColor::Green => "Green",
            SingleColor::Red => "Red",
            SingleColor::Magenta => "Magenta",
            SingleColor::Yellow => "Yellow",
            SingleColor::Black => "Black",
            SingleColor::Custom => "Custom",
        }
    }

    /// Resolve to a concrete colour. `custom` is used only for [`SingleColor::Custom`].
    pub fn resolve(self, palette: PaletteKind, custom: Color32) -> Color32 {
        match self {
            SingleColor::PaletteBlue => generate_palette(palette, 1)[0],
            SingleColor::Cyan => Color32::from_rgb(0, 191, 191),
            SingleColor::Blue => Color32::from_rgb(0, 0, 255),
            SingleColor::Green => Color32::from_rgb(0, 128, 0),
            SingleColor::Red => Color32::from_rgb(255, 0, 0),
            SingleColor::Magenta => Color32::from_rgb(191, 0, 191),
            SingleColor::Yellow => Color32::from_rgb(191, 191, 0),
            SingleColor::Black => Color32::BLACK,
            SingleColor::Custom => custom,
        }
    }
}
