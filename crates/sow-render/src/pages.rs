//! Markup builders. Each public function returns the full document for
//! one output file; small private helpers keep the unit markup shared
//! between page kinds.

use chrono::Local;
use maud::{html, Markup, DOCTYPE};
use sow_scheme::{AllocatedScheme, Scheme, SchemeLibrary, SchemeUnit};

const STYLESHEET: &str = "sow.css";

fn shell(title: &str, body_class: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) }
                link rel="stylesheet" href=(STYLESHEET);
            }
            body class=(body_class) {
                (content)
                footer {
                    p.generated { "Generated " (Local::now().format("%d %B %Y")) }
                }
            }
        }
    }
}

/// The landing page: one row per teaching group.
pub fn index(library: &SchemeLibrary) -> Markup {
    shell(
        "Schemes of work",
        "index-page",
        html! {
            h1 { "Schemes of work" }
            table.scheme-list {
                thead {
                    tr { th { "Teaching group" } th { "Scheme" } th { "Pages" } }
                }
                tbody {
                    @for alloc in library.allocations() {
                        tr {
                            td.group { (alloc.title()) }
                            td.sid { (alloc.scheme_id) }
                            td.pages {
                                a href=(alloc.details_file_name()) { "scheme" }
                                " "
                                a href=(alloc.cards_file_name()) { "cards" }
                                " "
                                a href=(alloc.booklet_file_name()) { "booklet" }
                            }
                        }
                    }
                }
            }
        },
    )
}

/// The full scheme page for one teaching group, a section per half
/// term.
pub fn details(library: &SchemeLibrary, scheme: &Scheme, alloc: &AllocatedScheme) -> Markup {
    let title = format!("{}: scheme of work", alloc.title());
    shell(
        &title,
        "details-page",
        html! {
            header {
                h1 { (alloc.title()) " " span.sid { "(" (scheme.id()) ")" } }
                nav.scheme-nav {
                    @for other in library.allocations() {
                        @if other == alloc {
                            a.current href=(other.details_file_name()) { (other.title()) }
                        } @else {
                            a href=(other.details_file_name()) { (other.title()) }
                        }
                    }
                }
            }
            @for ht in library.half_terms() {
                @let units = scheme.units_for_half_term(ht.number);
                section.half-term {
                    h2 { "HT" (ht.number) ": " (ht.long_title) }
                    p.ht-meta { (ht.code) ", " (ht.weeks) " weeks" }
                    @if units.is_empty() {
                        p.empty { "Nothing scheduled." }
                    }
                    @for unit in units {
                        (unit_details(unit))
                    }
                }
            }
        },
    )
}

fn unit_details(unit: &SchemeUnit) -> Markup {
    html! {
        article.unit {
            h3 {
                (unit.title) " " span.unit-id { "[" (unit.id) "]" }
                @if unit.is_assessment() {
                    " " span.badge.assess { "assessment" }
                }
            }
            @if !unit.objectives.is_empty() {
                ul.objectives {
                    @for objective in &unit.objectives {
                        li { (objective) }
                    }
                }
            }
            @if !unit.keywords.is_empty() {
                p.keywords { "Keywords: " (unit.keywords.join(", ")) }
            }
            @if !unit.textbook_links.is_empty() {
                ul.textbook-links {
                    @for link in &unit.textbook_links {
                        @let local = link.path.to_string_lossy().into_owned();
                        li {
                            a href=(local) { (link.title) }
                            " " a.online href=(link.url) { "online" }
                        }
                    }
                }
            }
            @if let Some(file) = &unit.file {
                @let href = file.to_string_lossy().into_owned();
                @if unit.is_assessment() {
                    p.test-file { a href=(href) { "Test paper" } }
                } @else {
                    p.unit-file { a href=(href) { "Worksheet" } }
                }
            }
            @if !unit.questions.is_empty() {
                table.questions {
                    thead { tr { th { "Q" } th { "Topic" } th { "Marks" } } }
                    tbody {
                        @for q in &unit.questions {
                            tr {
                                td { (q.number) }
                                td { (q.topic) }
                                td {
                                    @if let Some(marks) = q.marks { (marks) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Printable revision cards, one per unit.
pub fn cards(scheme: &Scheme, alloc: &AllocatedScheme) -> Markup {
    let title = format!("{}: revision cards", alloc.title());
    shell(
        &title,
        "cards-page",
        html! {
            h1.print-hidden { (title) }
            @for unit in scheme.units() {
                section.card {
                    h2 { (unit.title) }
                    ul.objectives {
                        @for objective in &unit.objectives {
                            li { (objective) }
                        }
                    }
                    @if !unit.keywords.is_empty() {
                        p.keywords { (unit.keywords.join(", ")) }
                    }
                }
            }
        },
    )
}

/// Pupil booklet: a tick box per objective.
pub fn booklet(scheme: &Scheme, alloc: &AllocatedScheme) -> Markup {
    let title = format!("{}: objectives booklet", alloc.title());
    shell(
        &title,
        "booklet-page",
        html! {
            h1 { (title) }
            @for unit in scheme.units() {
                @if !unit.is_assessment() {
                    section.booklet-unit {
                        h2 { (unit.title) }
                        ul.checklist {
                            @for objective in &unit.objectives {
                                li {
                                    input type="checkbox";
                                    " " (objective)
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
