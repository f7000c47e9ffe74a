use crate::domain::model::{CourseId, SeatRecord, SectionId};
use crate::utils::error::{Result, TrackerError};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// A section that was present in the markup but could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSkip {
    pub course_id: CourseId,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ParsedPage {
    pub records: Vec<SeatRecord>,
    pub skipped: Vec<SectionSkip>,
}

/// Extracts seat counters from a catalog `sections` page.
pub struct SectionParser {
    course_sel: Selector,
    section_sel: Selector,
    section_id_sel: Selector,
    open_seats_sel: Selector,
    total_seats_sel: Selector,
    waitlist_sel: Selector,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| TrackerError::ParseError {
        message: format!("invalid selector '{}': {}", css, e),
    })
}

impl SectionParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            course_sel: selector("div[id]")?,
            section_sel: selector("div.section")?,
            section_id_sel: selector(r#"input[name="sectionId"]"#)?,
            open_seats_sel: selector("span.open-seats-count")?,
            total_seats_sel: selector("span.total-seats-count")?,
            waitlist_sel: selector("span.waitlist-count")?,
        })
    }

    /// Courses missing from the page are not an error; the catalog simply
    /// omits courses with no sections this term.
    pub fn parse(&self, markup: &str, course_ids: &[CourseId]) -> ParsedPage {
        let doc = Html::parse_document(markup);

        // id -> 第一個符合的 div
        let mut containers: HashMap<&str, ElementRef> = HashMap::new();
        for div in doc.select(&self.course_sel) {
            if let Some(id) = div.value().attr("id") {
                containers.entry(id).or_insert(div);
            }
        }

        let mut page = ParsedPage::default();
        for course_id in course_ids {
            tracing::debug!("Parsing seats info for: {}", course_id);
            let Some(container) = containers.get(course_id.as_str()) else {
                tracing::debug!("{} not present on page", course_id);
                continue;
            };

            for section in container.select(&self.section_sel) {
                match self.parse_section(course_id, section) {
                    Ok(record) => page.records.push(record),
                    Err(reason) => {
                        tracing::warn!("Skipping malformed section of {}: {}", course_id, reason);
                        page.skipped.push(SectionSkip {
                            course_id: course_id.clone(),
                            reason,
                        });
                    }
                }
            }
        }

        page
    }

    fn parse_section(
        &self,
        course_id: &CourseId,
        section: ElementRef,
    ) -> std::result::Result<SeatRecord, String> {
        let section_id = section
            .select(&self.section_id_sel)
            .next()
            .and_then(|input| input.value().attr("value"))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or("missing sectionId input")?;

        Ok(SeatRecord {
            course_id: course_id.clone(),
            section_id: SectionId::new(section_id),
            current_seats: read_count(section, &self.open_seats_sel, "open-seats-count")?,
            max_seats: read_count(section, &self.total_seats_sel, "total-seats-count")?,
            waitlist: read_count(section, &self.waitlist_sel, "waitlist-count")?,
        })
    }
}

fn read_count(
    section: ElementRef,
    sel: &Selector,
    name: &str,
) -> std::result::Result<u32, String> {
    let text: String = section
        .select(sel)
        .next()
        .ok_or_else(|| format!("missing {}", name))?
        .text()
        .collect();

    text.trim()
        .parse()
        .map_err(|_| format!("{} is not a count: '{}'", name, text.trim()))
}
