//! Iterable, seekable collection of order records.

use crate::error::{RazorgatorError, Result};
use crate::types::{FieldValue, Record};
use crate::xml::XmlDocument;
use std::ops::Index;
use tracing::debug;

/// Which value of a record is compared by [`ResultSet::exclude_results`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExcludeBy {
    /// `office.brokerage.id`
    #[default]
    Brokerage,
    /// `office.id`
    Office,
    /// A top-level field of the record
    Field(String),
}

impl ExcludeBy {
    fn path(&self) -> Vec<&str> {
        match self {
            ExcludeBy::Brokerage => vec!["office", "brokerage", "id"],
            ExcludeBy::Office => vec!["office", "id"],
            ExcludeBy::Field(name) => vec![name.as_str()],
        }
    }
}

impl From<&str> for ExcludeBy {
    fn from(mode: &str) -> Self {
        match mode {
            "brokerage" => ExcludeBy::Brokerage,
            "office" => ExcludeBy::Office,
            field => ExcludeBy::Field(field.to_string()),
        }
    }
}

/// Records parsed from an `<orders>` document, in document order.
///
/// The set carries one cursor (`seek`/`current`/`next`/...). Moving it
/// needs `&mut self`, so a set cannot be walked by two consumers at once;
/// use [`ResultSet::iter`] for independent passes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    results: Vec<Record>,
    cursor: usize,
}

impl ResultSet {
    /// Parse a response body. Every child of the root contributes one
    /// record, taken from the attributes of its first child element.
    pub fn parse(xml: &str) -> Result<Self> {
        let document = XmlDocument::parse(xml)?;
        Ok(Self::from_document(&document))
    }

    /// Build from an already parsed document
    pub fn from_document(document: &XmlDocument) -> Self {
        let results = document
            .root()
            .children
            .iter()
            .map(|item| item.first_child().map(Record::from_element).unwrap_or_default())
            .collect::<Vec<_>>();

        debug!(
            "Built result set of {} records from <{}>",
            results.len(),
            document.root_name()
        );
        Self::from_records(results)
    }

    pub fn from_records(results: Vec<Record>) -> Self {
        Self { results, cursor: 0 }
    }

    /// Number of records in this set
    pub fn count(&self) -> usize {
        self.results.len()
    }

    /// Total number of records available. The service does not page, so
    /// this is the same as [`count`](Self::count).
    pub fn total_results(&self) -> usize {
        self.count()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Move the cursor to `index`
    pub fn seek(&mut self, index: i64) -> Result<()> {
        match usize::try_from(index) {
            Ok(position) if position < self.results.len() => {
                self.cursor = position;
                Ok(())
            }
            _ => Err(RazorgatorError::OutOfRange {
                index,
                count: self.results.len(),
            }),
        }
    }

    /// Record under the cursor, `None` once iteration has run off the end
    pub fn current(&self) -> Option<&Record> {
        self.results.get(self.cursor)
    }

    /// Cursor position
    pub fn key(&self) -> usize {
        self.cursor
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        self.cursor += 1;
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn valid(&self) -> bool {
        self.cursor < self.results.len()
    }

    /// Remove every record whose value at the `by` path is one of `exclude`.
    ///
    /// Usually used to hide inventory of particular brokerages or offices:
    ///
    /// ```
    /// # use razorgator::{ExcludeBy, ResultSet};
    /// # let mut results = ResultSet::default();
    /// results.exclude_results([1, 3, 5], ExcludeBy::Brokerage);
    /// results.exclude_results([42], "office");
    /// ```
    ///
    /// Records without the path are kept. Survivors keep their relative
    /// order and the cursor is rewound.
    pub fn exclude_results<V, I>(&mut self, exclude: I, by: impl Into<ExcludeBy>)
    where
        V: Into<FieldValue>,
        I: IntoIterator<Item = V>,
    {
        let exclude: Vec<FieldValue> = exclude.into_iter().map(Into::into).collect();
        let by = by.into();
        let path = by.path();
        let before = self.results.len();

        self.results.retain(|record| match record.get_path(&path) {
            Some(value) => !exclude.iter().any(|id| value.matches(id)),
            None => true,
        });
        self.cursor = 0;

        debug!(
            "Excluded {} of {} records by {:?}",
            before - self.results.len(),
            before,
            by
        );
    }

    /// All records, bypassing the cursor
    pub fn results(&self) -> &[Record] {
        &self.results
    }

    pub fn into_results(self) -> Vec<Record> {
        self.results
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.results.get(index)
    }

    /// Independent iterator that leaves the cursor alone
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.results.iter()
    }
}

impl std::str::FromStr for ResultSet {
    type Err = RazorgatorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Index<usize> for ResultSet {
    type Output = Record;

    fn index(&self, index: usize) -> &Record {
        &self.results[index]
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}
