use sow_scheme::{
    AllocatedScheme, AssessmentQuestion, HalfTerm, Scheme, SchemeLibrary, SchemeUnit,
};
use sow_render::pages;

fn sample_library() -> SchemeLibrary {
    let mut scheme = Scheme::new("8c");

    let mut a1 = SchemeUnit::new("a1", "Algebra 1", 1, "learn");
    a1.objectives.push("collect like terms".into());
    a1.objectives.push("expand single brackets".into());
    a1.keywords.push("term".into());
    a1.keywords.push("coefficient".into());
    scheme.add_unit(a1).unwrap();

    let mut t1 = SchemeUnit::new("t1", "Autumn test", 2, "assess");
    t1.file = Some("tests/autumn.pdf".into());
    t1.questions.push(AssessmentQuestion {
        number: "1".into(),
        topic: "simplifying".into(),
        marks: Some(3),
    });
    scheme.add_unit(t1).unwrap();

    let mut library = SchemeLibrary::default();
    library.add_scheme(scheme);
    library.allocate("Year 8 Set 1", "8c").unwrap();
    library.allocate("Year 8 Set 2", "8c").unwrap();
    library.add_half_term(HalfTerm {
        number: 1,
        title: "Aut 1".into(),
        long_title: "Autumn first half".into(),
        code: "aut1".into(),
        weeks: 7,
    });
    library.add_half_term(HalfTerm {
        number: 2,
        title: "Aut 2".into(),
        long_title: "Autumn second half".into(),
        code: "aut2".into(),
        weeks: 7,
    });
    library.add_half_term(HalfTerm {
        number: 3,
        title: "Spr 1".into(),
        long_title: "Spring first half".into(),
        code: "spr1".into(),
        weeks: 6,
    });
    library
}

#[test]
fn index_lists_every_allocation() {
    let library = sample_library();
    let html = pages::index(&library).into_string();

    assert!(html.contains("Year 8 Set 1"));
    assert!(html.contains("Year 8 Set 2"));
    assert!(html.contains(r#"href="scheme-year-8-set-1.html""#));
    assert!(html.contains(r#"href="cards-year-8-set-2.html""#));
    assert!(html.contains(r#"href="booklet-year-8-set-1.html""#));
}

#[test]
fn details_groups_units_by_half_term() {
    let library = sample_library();
    let alloc = &library.allocations()[0];
    let scheme = library.scheme("8c").unwrap();
    let html = pages::details(&library, scheme, alloc).into_string();

    assert!(html.contains("HT1: Autumn first half"));
    assert!(html.contains("Algebra 1"));
    assert!(html.contains("collect like terms"));
    assert!(html.contains("Keywords: term, coefficient"));
    // Nothing scheduled in spring.
    assert!(html.contains("Nothing scheduled."));
    // The current group is marked in the nav.
    assert!(html.contains(r#"class="current""#));
    // Assessment extras.
    assert!(html.contains("assessment"));
    assert!(html.contains(r#"href="tests/autumn.pdf""#));
    assert!(html.contains("simplifying"));
}

#[test]
fn details_escapes_markup_in_titles() {
    let mut library = sample_library();
    let mut scheme = Scheme::new("7x");
    scheme
        .add_unit(SchemeUnit::new("u1", "Less <than> & more", 1, "learn"))
        .unwrap();
    library.add_scheme(scheme);
    library.allocate("Year 7 Set 1", "7x").unwrap();

    let alloc = AllocatedScheme::new("Year 7 Set 1", "7x");
    let scheme = library.scheme("7x").unwrap();
    let html = pages::details(&library, scheme, &alloc).into_string();

    assert!(html.contains("Less &lt;than&gt; &amp; more"));
    assert!(!html.contains("Less <than>"));
}

#[test]
fn unit_file_label_depends_on_the_unit_kind() {
    let mut library = sample_library();
    let mut scheme = Scheme::new("9z");
    let mut u1 = SchemeUnit::new("u1", "Fractions", 1, "learn");
    u1.file = Some("sheets/fractions.pdf".into());
    scheme.add_unit(u1).unwrap();
    library.add_scheme(scheme);
    library.allocate("Year 9 Set 3", "9z").unwrap();

    // A taught unit's file is a worksheet, not a test paper.
    let alloc = AllocatedScheme::new("Year 9 Set 3", "9z");
    let scheme = library.scheme("9z").unwrap();
    let html = pages::details(&library, scheme, &alloc).into_string();
    assert!(html.contains(r#"href="sheets/fractions.pdf""#));
    assert!(html.contains("Worksheet"));
    assert!(!html.contains("Test paper"));

    // The assessment unit keeps its test paper label.
    let alloc = &library.allocations()[0];
    let scheme = library.scheme("8c").unwrap();
    let html = pages::details(&library, scheme, alloc).into_string();
    assert!(html.contains("Test paper"));
    assert!(!html.contains("Worksheet"));
}

#[test]
fn booklet_has_a_checkbox_per_objective_and_skips_assessments() {
    let library = sample_library();
    let alloc = &library.allocations()[0];
    let scheme = library.scheme("8c").unwrap();
    let html = pages::booklet(scheme, alloc).into_string();

    assert_eq!(html.matches(r#"type="checkbox""#).count(), 2);
    assert!(!html.contains("Autumn test"));
}

#[test]
fn cards_carry_objectives_and_keywords() {
    let library = sample_library();
    let alloc = &library.allocations()[0];
    let scheme = library.scheme("8c").unwrap();
    let html = pages::cards(scheme, alloc).into_string();

    assert!(html.contains("Algebra 1"));
    assert!(html.contains("expand single brackets"));
    assert!(html.contains("term, coefficient"));
}

#[test]
fn render_site_writes_all_files() {
    let dir = tempfile::tempdir().unwrap();
    let settings = sow_scheme::Settings {
        output_dir: dir.path().join("out"),
        ..Default::default()
    };
    let library = sample_library();

    sow_render::render_site(&library, &settings).unwrap();

    for name in [
        "index.html",
        "scheme-year-8-set-1.html",
        "cards-year-8-set-1.html",
        "booklet-year-8-set-1.html",
        "scheme-year-8-set-2.html",
    ] {
        assert!(dir.path().join("out").join(name).exists(), "missing {name}");
    }
}
