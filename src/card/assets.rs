//! Static artwork: the language icon table and the embedded SVG icons.

use tiny_skia::Pixmap;

use super::images::rasterize_svg;
use super::theme::Rgba;
use crate::error::Result;

/// Remote CDN serving the language icons listed in [`LANGUAGE_ICONS`].
pub const ICON_CDN_BASE: &str = "https://cdn.jsdelivr.net/gh/devicons/devicon/icons";

/// Lower-cased language name to icon path under [`ICON_CDN_BASE`].
pub static LANGUAGE_ICONS: &[(&str, &str)] = &[
    ("bash", "bash/bash-original.svg"),
    ("c", "c/c-original.svg"),
    ("c#", "csharp/csharp-original.svg"),
    ("clojure", "clojure/clojure-original.svg"),
    ("cmake", "cmake/cmake-original.svg"),
    ("coffeescript", "coffeescript/coffeescript-original.svg"),
    ("cplusplus", "cplusplus/cplusplus-original.svg"),
    ("csharp", "csharp/csharp-original.svg"),
    ("css", "css3/css3-original.svg"),
    ("dart", "dart/dart-original.svg"),
    ("dockerfile", "docker/docker-original.svg"),
    ("elixir", "elixir/elixir-original.svg"),
    ("elm", "elm/elm-original.svg"),
    ("erlang", "erlang/erlang-original.svg"),
    ("go", "go/go-original.svg"),
    ("groovy", "groovy/groovy-original.svg"),
    ("haskell", "haskell/haskell-original.svg"),
    ("html", "html5/html5-original.svg"),
    ("java", "java/java-original.svg"),
    ("javascript", "javascript/javascript-original.svg"),
    ("julia", "julia/julia-original.svg"),
    ("jupyter notebook", "jupyter/jupyter-original.svg"),
    ("kotlin", "kotlin/kotlin-original.svg"),
    ("lua", "lua/lua-original.svg"),
    ("nix", "nixos/nixos-original.svg"),
    ("objective-c", "objectivec/objectivec-plain.svg"),
    ("ocaml", "ocaml/ocaml-original.svg"),
    ("perl", "perl/perl-original.svg"),
    ("php", "php/php-original.svg"),
    ("powershell", "powershell/powershell-original.svg"),
    ("python", "python/python-original.svg"),
    ("r", "r/r-original.svg"),
    ("ruby", "ruby/ruby-original.svg"),
    ("rust", "rust/rust-original.svg"),
    ("scala", "scala/scala-original.svg"),
    ("scss", "sass/sass-original.svg"),
    ("shell", "bash/bash-original.svg"),
    ("solidity", "solidity/solidity-original.svg"),
    ("svelte", "svelte/svelte-original.svg"),
    ("swift", "swift/swift-original.svg"),
    ("typescript", "typescript/typescript-original.svg"),
    ("vue", "vuejs/vuejs-original.svg"),
    ("zig", "zig/zig-original.svg"),
];

/// Icon path for a language name, matched case-insensitively.
///
/// `c++` is looked up under its `cplusplus` entry.
pub fn language_icon_path(language: &str) -> Option<&'static str> {
    let lower = language.trim().to_lowercase();
    let key = if lower == "c++" { "cplusplus" } else { lower.as_str() };

    LANGUAGE_ICONS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, path)| *path)
}

pub fn language_icon_url(language: &str) -> Option<String> {
    language_icon_path(language).map(|path| format!("{}/{}", ICON_CDN_BASE, path))
}

/// Counters shown in the stats row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatIcon {
    Star,
    Fork,
    Issues,
}

impl StatIcon {
    fn body(self) -> &'static str {
        match self {
            StatIcon::Star => {
                r#"<path d="M11.525 2.295a.53.53 0 0 1 .95 0l2.31 4.679a2.123 2.123 0 0 0 1.595 1.16l5.166.756a.53.53 0 0 1 .294.904l-3.736 3.638a2.123 2.123 0 0 0-.611 1.878l.882 5.14a.53.53 0 0 1-.771.56l-4.618-2.428a2.122 2.122 0 0 0-1.973 0L6.396 21.01a.53.53 0 0 1-.77-.56l.881-5.139a2.122 2.122 0 0 0-.611-1.879L2.16 9.795a.53.53 0 0 1 .294-.906l5.165-.755a2.122 2.122 0 0 0 1.597-1.16z"/>"#
            }
            StatIcon::Fork => {
                r#"<circle cx="12" cy="18" r="3"/><circle cx="6" cy="6" r="3"/><circle cx="18" cy="6" r="3"/><path d="M18 9v2c0 .6-.4 1-1 1H7c-.6 0-1-.4-1-1V9"/><path d="M12 12v3"/>"#
            }
            StatIcon::Issues => r#"<circle cx="12" cy="12" r="10"/><circle cx="12" cy="12" r="1"/>"#,
        }
    }

    /// Stroke-only 24×24 SVG in `color`.
    pub fn svg(self, color: Rgba) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="{}" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">{}</svg>"#,
            hex(color),
            self.body()
        )
    }

    pub fn rasterize(self, color: Rgba, size: u32) -> Result<Pixmap> {
        rasterize_svg(self.svg(color).as_bytes(), size)
    }
}

/// Brand mark: a rounded frame with a lens, in `color`.
pub fn logo_svg(color: Rgba) -> String {
    let c = hex(color);
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 64 64" fill="none"><rect x="6" y="14" width="52" height="40" rx="10" stroke="{c}" stroke-width="5"/><rect x="22" y="6" width="20" height="10" rx="3" fill="{c}"/><circle cx="32" cy="34" r="10" stroke="{c}" stroke-width="5"/></svg>"#
    )
}

pub fn logo(color: Rgba, size: u32) -> Result<Pixmap> {
    rasterize_svg(logo_svg(color).as_bytes(), size)
}

fn hex(color: Rgba) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}
