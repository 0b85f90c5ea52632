use std::collections::HashMap;

/// Hands out DOM ids that are unique within one document: `email`, `email_0`, `email_1`, ...
///
/// Characters that are not valid in an id are replaced with `_`.
#[derive(Clone, Debug, Default)]
pub struct IdAllocator {
    used: HashMap<String, u32>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, base: &str) -> String {
        let base = sanitize(base);
        if !self.used.contains_key(&base) {
            self.used.insert(base.clone(), 0);
            return base;
        }
        loop {
            let counter = self.used.get_mut(&base).map(|next| {
                let n = *next;
                *next += 1;
                n
            });
            let candidate = format!("{base}_{}", counter.unwrap_or(0));
            if !self.used.contains_key(&candidate) {
                self.used.insert(candidate.clone(), 0);
                return candidate;
            }
        }
    }

    /// Marks `id` as taken, e.g. an id attribute written literally by a template.
    pub fn reserve(&mut self, id: &str) {
        self.used.entry(sanitize(id)).or_insert(0);
    }

    pub fn is_allocated(&self, id: &str) -> bool {
        self.used.contains_key(id)
    }
}

fn sanitize(base: &str) -> String {
    let mut out: String = base
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    if out.is_empty() || !out.as_bytes()[0].is_ascii_alphabetic() {
        out.insert(0, 'x');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_suffixes_in_order() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate("email"), "email");
        assert_eq!(ids.allocate("email"), "email_0");
        assert_eq!(ids.allocate("email"), "email_1");
        assert_eq!(ids.allocate("name"), "name");
    }

    #[test]
    fn skips_reserved_candidates() {
        let mut ids = IdAllocator::new();
        ids.reserve("email_0");
        assert_eq!(ids.allocate("email"), "email");
        assert_eq!(ids.allocate("email"), "email_1");
        assert!(ids.is_allocated("email_0"));
    }

    #[test]
    fn sanitizes_invalid_characters() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate("form.email"), "form_email");
        assert_eq!(ids.allocate("0day"), "x0day");
        assert_eq!(ids.allocate(""), "x");
    }
}
