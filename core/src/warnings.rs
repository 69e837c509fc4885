use std::collections::HashMap;

/// Page identifier -> warnings, pages kept in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct WarningLog {
    pages: Vec<(String, Vec<String>)>,
    positions: HashMap<String, usize>,
}

impl WarningLog {
    pub fn new() -> Self { Self::default() }

    /// Make sure `page` has an entry, even without warnings.
    pub fn touch(&mut self, page: &str) -> &mut Vec<String> {
        let pos = match self.positions.get(page) {
            Some(&pos) => pos,
            None => {
                self.pages.push((page.to_string(), Vec::new()));
                self.positions.insert(page.to_string(), self.pages.len() - 1);
                self.pages.len() - 1
            }
        };
        &mut self.pages[pos].1
    }

    pub fn warn(&mut self, page: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(page, %message, "warning recorded");
        self.touch(page).push(message);
    }

    pub fn get(&self, page: &str) -> &[String] {
        self.positions.get(page).map_or(&[], |&pos| self.pages[pos].1.as_slice())
    }

    /// Pages with at least one warning, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.pages
            .iter()
            .filter(|(_, w)| !w.is_empty())
            .map(|(p, w)| (p.as_str(), w.as_slice()))
    }

    /// Total number of warnings across pages.
    pub fn len(&self) -> usize { self.pages.iter().map(|(_, w)| w.len()).sum() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Console summary printed once the build completes.
    pub fn report(&self) -> String {
        let mut out = String::from("Pages successfully built!\n");
        if self.is_empty() {
            out.push_str("✅ No warnings\n");
            return out;
        }
        for (page, warnings) in self.iter() {
            out.push_str(&format!("⚠️  {}: {}\n", page, warnings.join(", ")));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_seen_page_order() {
        let mut log = WarningLog::new();
        log.touch("index");
        log.warn("work", "Empty content");
        log.warn("about", "Not linked in any other site");
        log.warn("work", "Invalid local path 'wrok'");
        let pages: Vec<&str> = log.iter().map(|(p, _)| p).collect();
        assert_eq!(pages, vec!["work", "about"]);
        assert_eq!(log.get("work").len(), 2);
        assert!(log.get("index").is_empty());
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn clean_report() {
        let log = WarningLog::new();
        assert_eq!(log.report(), "Pages successfully built!\n✅ No warnings\n");
    }

    #[test]
    fn report_lists_each_page_once() {
        let mut log = WarningLog::new();
        log.warn("work", "Empty content");
        log.warn("work", "Empty section");
        assert_eq!(log.report(), "Pages successfully built!\n⚠️  work: Empty content, Empty section\n");
    }
}
