use std::borrow::Cow;

/// Translation capability.
///
/// Every source of localized text (an in-memory catalog, a hot-swappable
/// handle, the untranslated passthrough) implements this trait so UI
/// components can be handed any of them without caring which.
pub trait Translatable: Send + Sync {
    /// Resolve `source` within `context`, optionally disambiguated by `comment`.
    ///
    /// Never fails: when nothing matches, the untranslated `source` comes back.
    fn lookup<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        comment: Option<&str>,
    ) -> Cow<'a, str>;

    /// Shorthand for a lookup without a disambiguation comment.
    fn tr<'a>(&'a self, context: &str, source: &'a str) -> Cow<'a, str> {
        self.lookup(context, source, None)
    }
}

/// Passthrough used when no catalog could be loaded: every lookup returns
/// the source text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Untranslated;

impl Translatable for Untranslated {
    fn lookup<'a>(
        &'a self,
        _context: &str,
        source: &'a str,
        _comment: Option<&str>,
    ) -> Cow<'a, str> {
        Cow::Borrowed(source)
    }
}

impl<T: Translatable + ?Sized> Translatable for Box<T> {
    fn lookup<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        comment: Option<&str>,
    ) -> Cow<'a, str> {
        (**self).lookup(context, source, comment)
    }
}

impl<T: Translatable + ?Sized> Translatable for std::sync::Arc<T> {
    fn lookup<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        comment: Option<&str>,
    ) -> Cow<'a, str> {
        (**self).lookup(context, source, comment)
    }
}
