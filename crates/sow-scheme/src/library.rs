//! The in-memory join of the config tables.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};

use crate::settings::Settings;
use crate::tables::{
    self, GroupRow, HalfTermRow, KeywordRow, ObjectiveRow, QuestionRow, UnitRow,
};
use crate::textbooks::{self, TextbookLink};

/// A block of the teaching year, as declared in `HalfTerms.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HalfTerm {
    pub number: u32,
    pub title: String,
    pub long_title: String,
    pub code: String,
    pub weeks: u32,
}

/// One question of an assessment unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssessmentQuestion {
    pub number: String,
    pub topic: String,
    pub marks: Option<u32>,
}

/// One taught (or assessed) unit within a scheme.
#[derive(Debug, Clone)]
pub struct SchemeUnit {
    pub id: String,
    pub title: String,
    pub half_term: u32,
    /// Raw `type` column value; anything but `assess` is a taught unit.
    pub kind: String,
    /// Worksheet or test paper under the output directory, if it exists.
    pub file: Option<PathBuf>,
    pub objectives: Vec<String>,
    pub keywords: Vec<String>,
    pub textbook_links: Vec<TextbookLink>,
    pub questions: Vec<AssessmentQuestion>,
}

impl SchemeUnit {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        half_term: u32,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            half_term,
            kind: kind.into(),
            file: None,
            objectives: Vec::new(),
            keywords: Vec::new(),
            textbook_links: Vec::new(),
            questions: Vec::new(),
        }
    }

    pub fn is_assessment(&self) -> bool {
        self.kind.eq_ignore_ascii_case("assess")
    }
}

/// An ordered collection of units taught under one scheme id.
#[derive(Debug, Clone)]
pub struct Scheme {
    id: String,
    units: Vec<SchemeUnit>,
}

impl Scheme {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into().to_lowercase(),
            units: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn units(&self) -> &[SchemeUnit] {
        &self.units
    }

    pub fn add_unit(&mut self, unit: SchemeUnit) -> anyhow::Result<()> {
        if self.units.iter().any(|u| u.id.eq_ignore_ascii_case(&unit.id)) {
            bail!("Scheme [{}] already has a unit with id [{}]", self.id, unit.id);
        }
        self.units.push(unit);
        Ok(())
    }

    pub fn unit(&self, id: &str) -> anyhow::Result<&SchemeUnit> {
        self.units
            .iter()
            .find(|u| u.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| self.unknown_unit(id))
    }

    pub fn unit_mut(&mut self, id: &str) -> anyhow::Result<&mut SchemeUnit> {
        match self.units.iter().position(|u| u.id.eq_ignore_ascii_case(id)) {
            Some(i) => Ok(&mut self.units[i]),
            None => Err(self.unknown_unit(id)),
        }
    }

    /// Units scheduled for the given half term, in source order.
    pub fn units_for_half_term(&self, number: u32) -> Vec<&SchemeUnit> {
        self.units.iter().filter(|u| u.half_term == number).collect()
    }

    fn unknown_unit(&self, id: &str) -> anyhow::Error {
        for u in &self.units {
            log::error!("Scheme [{}] has unit [{}]", self.id, u.id);
        }
        anyhow!("Could not find unit [{}] in scheme [{}]", id, self.id)
    }
}

/// One teaching group and the scheme it follows.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AllocatedScheme {
    pub teaching_group: String,
    pub scheme_id: String,
}

impl AllocatedScheme {
    pub fn new(teaching_group: impl Into<String>, scheme_id: impl Into<String>) -> Self {
        Self {
            teaching_group: teaching_group.into(),
            scheme_id: scheme_id.into().to_lowercase(),
        }
    }

    pub fn title(&self) -> &str {
        &self.teaching_group
    }

    fn slug(&self) -> String {
        self.teaching_group.to_lowercase().replace(' ', "-")
    }

    pub fn details_file_name(&self) -> String {
        format!("scheme-{}.html", self.slug())
    }

    pub fn cards_file_name(&self) -> String {
        format!("cards-{}.html", self.slug())
    }

    pub fn booklet_file_name(&self) -> String {
        format!("booklet-{}.html", self.slug())
    }
}

/// All known schemes plus which teaching groups use them.
#[derive(Debug, Default)]
pub struct SchemeLibrary {
    schemes: HashMap<String, Scheme>,
    allocations: Vec<AllocatedScheme>,
    half_terms: Vec<HalfTerm>,
}

impl SchemeLibrary {
    /// Reads every config table named by `settings` and joins them.
    pub fn load(settings: &Settings) -> anyhow::Result<Self> {
        let mut library = Self::default();

        let mut textbook_links = textbooks::find_textbook_links(
            &settings.textbook_dir(),
            &settings.output_dir,
            &settings.textbook_base_url,
        )?;

        library.load_units(settings, &mut textbook_links)?;
        library.load_objectives(settings)?;
        library.load_keywords(settings)?;
        library.load_questions(settings)?;
        library.load_allocations(settings)?;
        library.load_half_terms(settings)?;

        library
            .allocations
            .sort_by(|a, b| a.teaching_group.cmp(&b.teaching_group));

        log::info!(
            "Loaded {} schemes for {} teaching groups",
            library.schemes.len(),
            library.allocations.len()
        );
        Ok(library)
    }

    pub fn scheme(&self, id: &str) -> Option<&Scheme> {
        self.schemes.get(&id.to_lowercase())
    }

    pub fn scheme_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.schemes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Allocations, in teaching group title order after [`Self::load`].
    pub fn allocations(&self) -> &[AllocatedScheme] {
        &self.allocations
    }

    pub fn half_terms(&self) -> &[HalfTerm] {
        &self.half_terms
    }

    pub fn add_scheme(&mut self, scheme: Scheme) {
        self.schemes.insert(scheme.id().to_string(), scheme);
    }

    pub fn allocate(
        &mut self,
        teaching_group: impl Into<String>,
        scheme_id: &str,
    ) -> anyhow::Result<()> {
        if self.scheme(scheme_id).is_none() {
            bail!("Scheme [{scheme_id}] is not known");
        }
        self.allocations
            .push(AllocatedScheme::new(teaching_group, scheme_id));
        Ok(())
    }

    pub fn add_half_term(&mut self, half_term: HalfTerm) {
        self.half_terms.push(half_term);
    }

    fn load_units(
        &mut self,
        settings: &Settings,
        textbook_links: &mut HashMap<String, Vec<TextbookLink>>,
    ) -> anyhow::Result<()> {
        let path = settings.table("SchemeUnits.csv");
        let rows: Vec<UnitRow> =
            tables::read_rows(&path).with_context(|| format!("Loading {}", path.display()))?;

        for row in rows {
            let sid = row.scheme_id.trim().to_lowercase();
            if sid.is_empty() {
                log::warn!("No scheme id for unit [{}], skipping row", row.unit_id);
                continue;
            }
            let uid = row.unit_id.trim().to_lowercase();

            let mut unit = SchemeUnit::new(uid.clone(), row.unit_title, row.half_term, row.kind);

            // Only keep the file reference when the file is actually there.
            if let Some(name) = row.file.as_deref().filter(|f| !f.trim().is_empty()) {
                if settings.output_dir.join(name).exists() {
                    unit.file = Some(PathBuf::from(name));
                } else {
                    log::warn!("Could not find a file at {name}");
                }
            }

            if let Some(links) = textbook_links.remove(&format!("{sid}{uid}")) {
                unit.textbook_links = links;
            }

            let scheme = self.schemes.entry(sid.clone()).or_insert_with(|| {
                log::info!("Just added scheme [{sid}]");
                Scheme::new(sid.clone())
            });
            scheme.add_unit(unit)?;
            log::info!("Added unit [{uid}] to scheme [{sid}]");
        }
        Ok(())
    }

    fn load_objectives(&mut self, settings: &Settings) -> anyhow::Result<()> {
        let path = settings.table("Objectives.csv");
        let rows: Vec<ObjectiveRow> =
            tables::read_rows(&path).with_context(|| format!("Loading {}", path.display()))?;

        for row in rows {
            let (sid, uid, objective) = (
                row.scheme_id.trim().to_lowercase(),
                row.unit_id.trim().to_lowercase(),
                row.objective.trim().to_string(),
            );
            if sid.is_empty() || uid.is_empty() || objective.is_empty() {
                log::warn!("Incomplete objective row for [{sid}]/[{uid}], skipping");
                continue;
            }
            // Objectives can cover schemes we aren't building this run.
            let scheme = match self.schemes.get_mut(&sid) {
                Some(scheme) => scheme,
                None => continue,
            };
            scheme.unit_mut(&uid)?.objectives.push(objective);
        }
        Ok(())
    }

    fn load_keywords(&mut self, settings: &Settings) -> anyhow::Result<()> {
        let path = settings.table("Keywords.csv");
        let rows: Vec<KeywordRow> =
            tables::read_rows(&path).with_context(|| format!("Loading {}", path.display()))?;

        for row in rows {
            let (sid, uid, keyword) = (
                row.scheme_id.trim().to_lowercase(),
                row.unit_id.trim().to_lowercase(),
                row.keyword.trim().to_string(),
            );
            if sid.is_empty() || uid.is_empty() || keyword.is_empty() {
                log::warn!("Incomplete keyword row for [{sid}]/[{uid}], skipping");
                continue;
            }
            let scheme = match self.schemes.get_mut(&sid) {
                Some(scheme) => scheme,
                None => continue,
            };
            scheme.unit_mut(&uid)?.keywords.push(keyword);
        }
        Ok(())
    }

    fn load_questions(&mut self, settings: &Settings) -> anyhow::Result<()> {
        let path = settings.table("Assessments.csv");
        let rows: Vec<QuestionRow> =
            tables::read_rows(&path).with_context(|| format!("Loading {}", path.display()))?;

        for row in rows {
            if row.q.trim().is_empty() {
                log::warn!("No question number in assessment row for [{}], skipping", row.unit_id);
                continue;
            }
            let (sid, uid) = (
                row.scheme_id.trim().to_lowercase(),
                row.unit_id.trim().to_lowercase(),
            );
            let scheme = match self.schemes.get_mut(&sid) {
                Some(scheme) => scheme,
                None => continue,
            };
            let unit = scheme.unit_mut(&uid)?;
            if !unit.is_assessment() {
                log::warn!("Question [{}] targets non-assessment unit [{uid}]", row.q);
                continue;
            }
            unit.questions.push(AssessmentQuestion {
                number: row.q.trim().to_string(),
                topic: row.topic.trim().to_string(),
                marks: row.marks,
            });
        }
        Ok(())
    }

    fn load_allocations(&mut self, settings: &Settings) -> anyhow::Result<()> {
        let path = settings.table("SetsSchemes.csv");
        let rows: Vec<GroupRow> =
            tables::read_rows(&path).with_context(|| format!("Loading {}", path.display()))?;

        for row in rows {
            let group = row.teaching_group.trim();
            let sid = row.scheme_id.trim();
            if group.is_empty() || sid.is_empty() {
                log::warn!("Incomplete allocation row [{group}] -> [{sid}], skipping");
                continue;
            }
            self.allocate(group, sid)
                .with_context(|| format!("Allocating [{group}]"))?;
        }
        Ok(())
    }

    fn load_half_terms(&mut self, settings: &Settings) -> anyhow::Result<()> {
        let path = settings.table("HalfTerms.csv");
        let rows: Vec<HalfTermRow> =
            tables::read_rows(&path).with_context(|| format!("Loading {}", path.display()))?;

        for row in rows {
            self.half_terms.push(HalfTerm {
                number: row.half_term,
                title: row.title,
                long_title: row.long_title,
                code: row.code,
                weeks: row.weeks,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_unit_rejects_duplicates() {
        let mut scheme = Scheme::new("8C");
        assert_eq!(scheme.id(), "8c");

        scheme
            .add_unit(SchemeUnit::new("a1", "Algebra 1", 1, "learn"))
            .unwrap();
        let err = scheme
            .add_unit(SchemeUnit::new("A1", "Algebra again", 2, "learn"))
            .unwrap_err();
        assert!(err.to_string().contains("already has a unit"));
        assert_eq!(scheme.units().len(), 1);
    }

    #[test]
    fn unit_lookup_is_case_insensitive() {
        let mut scheme = Scheme::new("8c");
        scheme
            .add_unit(SchemeUnit::new("a1", "Algebra 1", 1, "learn"))
            .unwrap();

        assert_eq!(scheme.unit("A1").unwrap().title, "Algebra 1");
        assert!(scheme.unit("zz").is_err());
    }

    #[test]
    fn allocation_requires_a_known_scheme() {
        let mut library = SchemeLibrary::default();
        library.add_scheme(Scheme::new("8c"));

        library.allocate("Year 8 Set 1", "8C").unwrap();
        let err = library.allocate("Year 9 Set 1", "9x").unwrap_err();
        assert!(err.to_string().contains("not known"));
    }

    #[test]
    fn derived_file_names() {
        let alloc = AllocatedScheme::new("Year 7 Set 1", "8c");
        assert_eq!(alloc.details_file_name(), "scheme-year-7-set-1.html");
        assert_eq!(alloc.cards_file_name(), "cards-year-7-set-1.html");
        assert_eq!(alloc.booklet_file_name(), "booklet-year-7-set-1.html");
    }

    #[test]
    fn half_term_scheduling() {
        let mut scheme = Scheme::new("y12m");
        for (id, ht) in [("u1", 1), ("u2", 3), ("u3", 3), ("u4", 2)] {
            scheme
                .add_unit(SchemeUnit::new(id, format!("Unit {id}"), ht, "learn"))
                .unwrap();
        }

        let ht3 = scheme.units_for_half_term(3);
        assert_eq!(ht3.len(), 2);
        assert_eq!(ht3[0].id, "u2");
        assert_eq!(ht3[1].id, "u3");
        assert!(scheme.units_for_half_term(6).is_empty());
    }
}
