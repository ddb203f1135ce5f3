use super::*;
use lingo_core::config::LoadPolicy;
use lingo_core::traits::{Translatable, Untranslated};

fn ru() -> Catalog {
    let text = bundled("ru_RU").unwrap();
    parse_ts(text, "bundled:ru_RU", LoadPolicy::Strict)
        .unwrap()
        .catalog
}

#[test]
fn test_bundled_ru_loads_strict() {
    let cat = ru();
    assert_eq!(cat.language(), "ru_RU");
    let names: Vec<&str> = cat.contexts().iter().map(Context::name).collect();
    assert_eq!(
        names,
        vec![
            "si prefix alternative micro",
            "si prefixes",
            "ChannelSettings",
            "DigitalLines",
            "GUI",
            "IPAddressDialog",
            "IPAddressEntry",
        ]
    );
}

#[test]
fn test_start_translates() {
    assert_eq!(ru().lookup("GUI", "Start", None), "ПУСК");
}

#[test]
fn test_decimal_comma_preserved() {
    assert_eq!(ru().lookup("ChannelSettings", "±0.5 V", None), "±0,5 В");
    assert_eq!(ru().lookup("ChannelSettings", "±0.2 V", None), "±0,2 В");
}

#[test]
fn test_ellipsis_substituted() {
    let cat = ru();
    assert_eq!(cat.lookup("IPAddressEntry", "...", None), "…");
    assert_eq!(cat.lookup("IPAddressEntry", "Browse...", None), "Обзор…");
}

#[test]
fn test_en_dash_preserved() {
    assert_eq!(
        ru().lookup("ChannelSettings", "Channels 1 to 16 with common GND", None),
        "Каналы 1–16 с общей землёй"
    );
}

#[test]
fn test_unknown_context_falls_back() {
    let cat = ru();
    assert_eq!(cat.lookup("Nonexistent", "Start", None), "Start");
    let stats = cat.stats();
    assert_eq!(stats.unknown_context, 1);
    assert_eq!(stats.hits, 0);
}

#[test]
fn test_unknown_phrase_falls_back() {
    let cat = ru();
    assert_eq!(cat.lookup("GUI", "Reset", None), "Reset");
    assert_eq!(cat.stats().unknown_message, 1);
}

#[test]
fn test_context_names_are_case_sensitive() {
    assert_eq!(ru().lookup("gui", "Start", None), "Start");
}

#[test]
fn test_lookup_is_idempotent() {
    let cat = ru();
    let first = cat.lookup("DigitalLines", "Pulse rate:", None).to_string();
    for _ in 0..3 {
        assert_eq!(cat.lookup("DigitalLines", "Pulse rate:", None), first);
    }
    assert_eq!(first, "Частота импульсов:");
    assert_eq!(cat.stats().hits, 4);
}

#[test]
fn test_comment_disambiguation() {
    let cat = ru();
    assert_eq!(cat.lookup("GUI", "s", Some("unit: seconds")), "сек");
    assert_eq!(cat.lookup("GUI", "S/s", Some("unit: samples per second")), "отч/сек");
    // No comment-less "s" entry exists, so it must not pick up the seconds one.
    assert_eq!(cat.lookup("GUI", "s", None), "s");
    assert_eq!(cat.lookup("GUI", "s", Some("unit: meters")), "s");
}

#[test]
fn test_commented_and_plain_entries_resolve_independently() {
    let mut cat = Catalog::new("ru_RU");
    let mut gui = Context::new("GUI").unwrap();
    gui.insert(MessageEntry::new("s", "сек").with_comment("unit: seconds"))
        .unwrap();
    gui.insert(MessageEntry::new("s", "с")).unwrap();
    cat.push_context(gui).unwrap();
    assert_eq!(cat.lookup("GUI", "s", Some("unit: seconds")), "сек");
    assert_eq!(cat.lookup("GUI", "s", None), "с");
}

#[test]
fn test_same_text_in_two_contexts_stored_independently() {
    let mut cat = Catalog::new("ru_RU");
    for (ctx, tr) in [("GUI", "Поиск"), ("IPAddressDialog", "Найти")] {
        let mut c = Context::new(ctx).unwrap();
        c.insert(MessageEntry::new("Search", tr)).unwrap();
        cat.push_context(c).unwrap();
    }
    assert_eq!(cat.lookup("GUI", "Search", None), "Поиск");
    assert_eq!(cat.lookup("IPAddressDialog", "Search", None), "Найти");
}

#[test]
fn test_empty_translation_shows_source() {
    let mut cat = Catalog::new("ru_RU");
    let mut gui = Context::new("GUI").unwrap();
    gui.insert(MessageEntry::new("Stop", "").with_type(TranslationType::Unfinished))
        .unwrap();
    gui.insert(MessageEntry::new("Old", "Старый").with_type(TranslationType::Obsolete))
        .unwrap();
    cat.push_context(gui).unwrap();
    assert_eq!(cat.lookup("GUI", "Stop", None), "Stop");
    assert_eq!(cat.lookup("GUI", "Old", None), "Old");
    assert_eq!(cat.stats().untranslated, 2);
}

#[test]
fn test_all_source_texts_in_order_and_restartable() {
    let cat = ru();
    let texts = cat.all_source_texts("DigitalLines");
    assert_eq!(texts.len(), 4);
    let again = texts.clone();
    let collected: Vec<&str> = texts.collect();
    assert_eq!(
        collected,
        vec![
            "Increase emitter voltage",
            "Amplification:",
            "Pulse duration:",
            "Pulse rate:",
        ]
    );
    assert_eq!(again.collect::<Vec<_>>(), collected);
    assert_eq!(cat.all_source_texts("DigitalLines").count(), 4);
}

#[test]
fn test_all_source_texts_unknown_context_is_empty() {
    assert_eq!(ru().all_source_texts("Nonexistent").count(), 0);
}

#[test]
fn test_round_trip_bundled_catalog() {
    let cat = ru();
    let text = cat.to_ts_string().unwrap();
    let again = parse_ts(&text, "rt", LoadPolicy::Strict).unwrap().catalog;
    for ctx in cat.contexts() {
        for m in ctx.messages() {
            let comment = m.disambiguation_comment.as_deref();
            assert_eq!(
                again.lookup(ctx.name(), &m.source_text, comment),
                cat.lookup(ctx.name(), &m.source_text, comment),
                "{} / {}",
                ctx.name(),
                m.source_text
            );
        }
    }
    assert_eq!(again.message_count(), cat.message_count());
}

#[test]
fn test_translatable_implementors_agree() {
    let cat = ru();
    let handle = CatalogHandle::new(ru());
    let sources: [&dyn Translatable; 2] = [&cat, &handle];
    for t in sources {
        assert_eq!(t.tr("GUI", "Stop"), "ОСТАНОВ");
        assert_eq!(t.lookup("GUI", "s", Some("unit: seconds")), "сек");
        assert_eq!(t.tr("Nonexistent", "Start"), "Start");
    }
    assert_eq!(Untranslated.tr("GUI", "Stop"), "Stop");
}
