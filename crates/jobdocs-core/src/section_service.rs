use std::collections::HashSet;

use jobdocs_domain::LineItem;

use crate::CoreError;

/// Label shown for lines entered before any section heading was set.
pub const NO_SECTION_LABEL: &str = "[No Section]";

/// Lines sharing one section, in first-appearance order.
#[derive(Debug)]
pub struct SectionGroup<'a> {
    pub name: &'a str,
    pub lines: Vec<&'a LineItem>,
}

impl SectionGroup<'_> {
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            NO_SECTION_LABEL
        } else {
            self.name
        }
    }
}

pub struct SectionService;

impl SectionService {
    /// Distinct section names in the order they first appear.
    pub fn section_order(lines: &[LineItem]) -> Vec<String> {
        let mut order: Vec<String> = Vec::new();
        for line in lines {
            if !order.iter().any(|name| name == &line.section) {
                order.push(line.section.clone());
            }
        }
        order
    }

    pub fn groups(lines: &[LineItem]) -> Vec<SectionGroup<'_>> {
        let mut groups: Vec<SectionGroup<'_>> = Vec::new();
        for line in lines {
            match groups.iter_mut().find(|group| group.name == line.section) {
                Some(group) => group.lines.push(line),
                None => groups.push(SectionGroup {
                    name: &line.section,
                    lines: vec![line],
                }),
            }
        }
        groups
    }

    /// Parses an order such as `3,1,2` against `count` sections.
    /// Returns zero-based section positions.
    pub fn parse_order(raw: &str, count: usize) -> Result<Vec<usize>, CoreError> {
        let mut positions = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            let number: usize = part.parse().map_err(|_| {
                CoreError::Validation("enter only numbers separated by commas".into())
            })?;
            positions.push(number);
        }
        if positions.len() != count {
            return Err(CoreError::Validation(format!(
                "provide exactly {count} numbers"
            )));
        }
        if positions.iter().any(|&number| number == 0 || number > count) {
            return Err(CoreError::Validation(
                "one or more numbers are out of range".into(),
            ));
        }
        let unique: HashSet<_> = positions.iter().collect();
        if unique.len() != positions.len() {
            return Err(CoreError::Validation(
                "each section number must be used exactly once".into(),
            ));
        }
        Ok(positions.into_iter().map(|number| number - 1).collect())
    }

    /// Regroups lines so whole sections follow `order` (zero-based positions into
    /// [`SectionService::section_order`]). Order within a section is preserved.
    pub fn reorder(lines: Vec<LineItem>, order: &[usize]) -> Result<Vec<LineItem>, CoreError> {
        let sections = Self::section_order(&lines);
        let mut seen = HashSet::new();
        if order.len() != sections.len()
            || order
                .iter()
                .any(|&position| position >= sections.len() || !seen.insert(position))
        {
            return Err(CoreError::Validation(format!(
                "section order must be a permutation of {} sections",
                sections.len()
            )));
        }

        let mut buckets: Vec<Vec<LineItem>> = vec![Vec::new(); sections.len()];
        for line in lines {
            if let Some(index) = sections.iter().position(|name| name == &line.section) {
                buckets[index].push(line);
            }
        }

        let mut reordered = Vec::new();
        for &position in order {
            reordered.append(&mut buckets[position]);
        }
        Ok(reordered)
    }
}
