//! Shared emoji for terminal output.
//!
//! Each icon falls back to plain ASCII when the terminal cannot render emoji.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "* ");

// Progress indicators
pub static TROPHY: Emoji<'_, '_> = Emoji("🎉 ", "[LEVEL UP] ");
pub static STAR: Emoji<'_, '_> = Emoji("⭐ ", "[XP] ");
pub static FIRE: Emoji<'_, '_> = Emoji("🔥 ", "[STREAK] ");
pub static CLOCK: Emoji<'_, '_> = Emoji("⏱️  ", "[T] ");
pub static REPEAT: Emoji<'_, '_> = Emoji("🔁 ", "[R] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");
