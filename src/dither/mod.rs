//! Dithering strategies: quantizing a true-color image onto a panel palette
//!
//! Strategies share one contract ([`Dither::apply`]) and register under a
//! canonical lowercase-with-underscores name derived from the type name, so
//! callers can select them from configuration. The built-ins populate the
//! registry at first use; additional strategies register through
//! [`register`].

mod ordered;
mod threshold;

pub use ordered::Ordered;
pub use threshold::Threshold;

use std::any;
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use image::RgbaImage;

use crate::error::DitherError;
use crate::format::PixelFormat;
use crate::framebuffer::Framebuffer;
use crate::palette::Palette;

/// Common contract for quantization strategies.
///
/// A strategy is bound to one [`PixelFormat`], and through it one palette.
/// `apply` mutates the framebuffer in place. Source and framebuffer
/// dimensions must already match; callers validate, this layer does not.
pub trait Dither: Send + Sync {
    /// The pixel format this strategy quantizes into.
    fn format(&self) -> PixelFormat;

    /// The palette used for nearest-color matching.
    fn palette(&self) -> &'static Palette {
        self.format().palette()
    }

    /// Canonical registry name, derived from the type name.
    fn strategy_name(&self) -> String
    where
        Self: Sized,
    {
        derive_strategy_name(any::type_name::<Self>())
    }

    /// Quantize `source` into `target`, pixel by pixel.
    ///
    /// The default body is the abstract contract: invoking it without a
    /// concrete implementation fails with [`DitherError::NotImplemented`].
    fn apply(&self, source: &RgbaImage, target: &mut Framebuffer) -> Result<(), DitherError> {
        let _ = (source, target);
        Err(DitherError::NotImplemented)
    }
}

/// Lowercase-with-underscores name from the last segment of a type path.
fn derive_strategy_name(type_name: &str) -> String {
    let tail = type_name.rsplit("::").next().unwrap_or(type_name);
    let mut name = String::with_capacity(tail.len() + 4);
    for (i, ch) in tail.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                name.push('_');
            }
            name.push(ch.to_ascii_lowercase());
        } else {
            name.push(ch);
        }
    }
    name
}

/// Constructor signature stored in the strategy registry.
pub type StrategyFactory = fn(PixelFormat) -> Box<dyn Dither>;

fn registry() -> &'static RwLock<HashMap<String, StrategyFactory>> {
    static REGISTRY: OnceLock<RwLock<HashMap<String, StrategyFactory>>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut map: HashMap<String, StrategyFactory> = HashMap::new();
        map.insert(
            derive_strategy_name(any::type_name::<Threshold>()),
            |format| Box::new(Threshold::new(format)),
        );
        map.insert(
            derive_strategy_name(any::type_name::<Ordered>()),
            |format| Box::new(Ordered::new(format)),
        );
        RwLock::new(map)
    })
}

/// Register an additional strategy under `name`.
pub fn register(name: &str, factory: StrategyFactory) {
    registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name.to_string(), factory);
}

/// Construct a registered strategy by canonical name.
pub fn by_name(name: &str, format: PixelFormat) -> Result<Box<dyn Dither>, DitherError> {
    registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .map(|factory| factory(format))
        .ok_or_else(|| DitherError::UnknownStrategy(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unfinished;

    impl Dither for Unfinished {
        fn format(&self) -> PixelFormat {
            PixelFormat::Mono
        }
    }

    #[test]
    fn abstract_contract_reports_not_implemented() {
        let source = RgbaImage::new(1, 1);
        let mut target = Framebuffer::new(PixelFormat::Mono, 1, 1);
        assert_eq!(
            Unfinished.apply(&source, &mut target),
            Err(DitherError::NotImplemented)
        );
    }

    #[test]
    fn names_derive_from_type_identity() {
        assert_eq!(Threshold::new(PixelFormat::Mono).strategy_name(), "threshold");
        assert_eq!(Ordered::new(PixelFormat::Mono).strategy_name(), "ordered");
        assert_eq!(derive_strategy_name("crate::dither::FloydSteinberg"), "floyd_steinberg");
    }

    #[test]
    fn builtins_resolve_by_name() {
        assert!(by_name("threshold", PixelFormat::Mono).is_ok());
        assert!(by_name("ordered", PixelFormat::Color4).is_ok());
        assert!(matches!(
            by_name("sierra", PixelFormat::Mono),
            Err(DitherError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn extensions_register_under_their_own_name() {
        register("noop", |format| Box::new(Threshold::new(format)));
        let strategy = by_name("noop", PixelFormat::Gray4).unwrap();
        assert_eq!(strategy.format(), PixelFormat::Gray4);
    }
}
