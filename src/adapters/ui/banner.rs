//! Gradient ASCII banner (COACH).

use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{Write, stdout};

/// Warm Coral (#ff6f61).
const CORAL: (u8, u8, u8) = (0xff, 0x6f, 0x61);
/// Calm Teal (#2ec4b6).
const TEAL: (u8, u8, u8) = (0x2e, 0xc4, 0xb6);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let mix = |x: u8, y: u8| (f64::from(x) * (1.0 - t) + f64::from(y) * t).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Banner art, or plain text if the built-in font cannot render.
fn banner_art(text: &str) -> String {
    FIGfont::standard()
        .ok()
        .and_then(|font| font.convert(text).map(|fig| fig.to_string()))
        .unwrap_or_else(|| format!("{text}\n"))
}

/// Prints "COACH" with a coral-to-teal gradient, then the version line.
pub fn print_welcome() {
    let mut out = stdout();
    let art = banner_art("COACH");
    let lines: Vec<&str> = art.lines().collect();
    let total = lines.len();

    for (i, line) in lines.iter().enumerate() {
        let t = if total <= 1 {
            1.0
        } else {
            i as f64 / (total - 1) as f64
        };
        let (r, g, b) = lerp_rgb(CORAL, TEAL, t);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
        let _ = out.execute(ResetColor);
    }

    let _ = out.execute(SetForegroundColor(Color::Rgb {
        r: TEAL.0,
        g: TEAL.1,
        b: TEAL.2,
    }));
    let _ = out.execute(Print(format!(
        "Interview practice v{}\r\n",
        env!("CARGO_PKG_VERSION")
    )));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}
