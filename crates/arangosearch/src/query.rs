//! Count, find and search builders for a single collection.
//!
//! Each builder binds a database handle, a collection and the alias names
//! once, then runs any number of independent queries. No state is shared
//! between runs.

use crate::aql::{Aql, AqlQuery};
use crate::config::SearchConfig;
use crate::db::{all_values, next_value, AqlDatabase};
use crate::error::SearchError;
use crate::limit::{parse_limit, Limit};
use crate::sort::{parse_sort, Sort};
use crate::terms::{parse_terms, Terms};
use serde::de::DeserializeOwned;
use serde_json::Value as Json;
use std::marker::PhantomData;
use tracing::{debug, trace, warn};

/// Raw AQL fragments spliced at fixed points of a generated query.
///
/// Fragments are trusted: literal parts go in verbatim. Values inside a
/// fragment are still bound, not spliced.
#[derive(Debug, Clone, Default)]
pub struct Inject {
    pub before_filter: Option<Aql>,
    /// Ignored by count queries.
    pub before_sort: Option<Aql>,
    pub before_limit: Option<Aql>,
    pub after: Option<Aql>,
}

impl Inject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before_filter(mut self, aql: Aql) -> Self {
        self.before_filter = Some(aql);
        self
    }

    pub fn before_sort(mut self, aql: Aql) -> Self {
        self.before_sort = Some(aql);
        self
    }

    pub fn before_limit(mut self, aql: Aql) -> Self {
        self.before_limit = Some(aql);
        self
    }

    pub fn after(mut self, aql: Aql) -> Self {
        self.after = Some(aql);
        self
    }
}

/// Outcome of a search.
#[derive(Debug, Clone)]
pub struct SearchResult<T> {
    /// Number of matching documents, ignoring limit.
    pub total: u64,
    /// Matching documents, respecting limit.
    pub documents: Vec<T>,
    /// The query that fetched `documents`.
    pub query: AqlQuery,
}

impl<T> SearchResult<T> {
    pub fn into_parts(self) -> (u64, Vec<T>, AqlQuery) {
        (self.total, self.documents, self.query)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stage one: bind database, collection and aliases
// ─────────────────────────────────────────────────────────────────────────────

/// Counts documents matching search terms.
///
/// ```aql
/// FOR {i} IN {collection} {FILTER ...} COLLECT WITH COUNT INTO {n} RETURN {n}
/// ```
pub struct Count<'a, DB: AqlDatabase> {
    db: &'a DB,
    collection: String,
    root: String,
    count: String,
}

/// Returns the first document matching search terms.
///
/// ```aql
/// FOR {i} IN {collection} {FILTER ...} {SORT ...} LIMIT 1 RETURN {i}
/// ```
pub struct Find<'a, DB: AqlDatabase, T = Json> {
    db: &'a DB,
    collection: String,
    root: String,
    default_sort: Vec<Sort>,
    _doc: PhantomData<fn() -> T>,
}

/// Returns the total match count, the (possibly limited) matching documents
/// and the query used to fetch them.
///
/// ```aql
/// FOR {i} IN {collection} {FILTER ...} {SORT ...} {LIMIT ...} RETURN {i}
/// ```
pub struct Search<'a, DB: AqlDatabase, T = Json> {
    db: &'a DB,
    collection: String,
    root: String,
    count: String,
    default_sort: Vec<Sort>,
    _doc: PhantomData<fn() -> T>,
}

pub fn count<'a, DB: AqlDatabase>(db: &'a DB, collection: impl Into<String>) -> Count<'a, DB> {
    let cfg = SearchConfig::default();
    Count {
        db,
        collection: collection.into(),
        root: cfg.root_alias,
        count: cfg.count_alias,
    }
}

pub fn find<'a, DB: AqlDatabase>(db: &'a DB, collection: impl Into<String>) -> Find<'a, DB> {
    let cfg = SearchConfig::default();
    Find {
        db,
        collection: collection.into(),
        root: cfg.root_alias,
        default_sort: cfg.find_sort,
        _doc: PhantomData,
    }
}

pub fn search<'a, DB: AqlDatabase>(db: &'a DB, collection: impl Into<String>) -> Search<'a, DB> {
    let cfg = SearchConfig::default();
    Search {
        db,
        collection: collection.into(),
        root: cfg.root_alias,
        count: cfg.count_alias,
        default_sort: cfg.search_sort,
        _doc: PhantomData,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stage two: run
// ─────────────────────────────────────────────────────────────────────────────

impl<'a, DB: AqlDatabase> Count<'a, DB> {
    /// Override the document and count aliases.
    pub fn aliases(mut self, root: impl Into<String>, count: impl Into<String>) -> Self {
        self.root = root.into();
        self.count = count.into();
        self
    }

    pub fn with_config(mut self, cfg: &SearchConfig) -> Self {
        self.root = cfg.root_alias.clone();
        self.count = cfg.count_alias.clone();
        self
    }

    /// Count matching documents. No terms counts the whole collection.
    #[tracing::instrument(skip_all, fields(collection = %self.collection))]
    pub async fn run(
        &self,
        terms: Option<&Terms>,
        inject: Option<&Inject>,
    ) -> Result<u64, SearchError<DB::Error>> {
        let filters = filter_clause(terms, &self.root);
        let query = count_query(&self.collection, &self.root, &self.count, &filters, inject);
        execute_count(self.db, &query).await
    }

    /// As [`Count::run`], with terms decoded from JSON first.
    pub async fn run_json(
        &self,
        terms: &Json,
        inject: Option<&Inject>,
    ) -> Result<u64, SearchError<DB::Error>> {
        let terms = Terms::from_json(terms)?;
        self.run(Some(&terms), inject).await
    }
}

impl<'a, DB: AqlDatabase, T: DeserializeOwned> Find<'a, DB, T> {
    pub fn aliases(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_config(mut self, cfg: &SearchConfig) -> Self {
        self.root = cfg.root_alias.clone();
        self.default_sort = cfg.find_sort.clone();
        self
    }

    /// Decode found documents into `U` instead.
    pub fn typed<U: DeserializeOwned>(self) -> Find<'a, DB, U> {
        Find {
            db: self.db,
            collection: self.collection,
            root: self.root,
            default_sort: self.default_sort,
            _doc: PhantomData,
        }
    }

    /// Find the first matching document; `Ok(None)` when nothing matches.
    ///
    /// `sort` defaults to `_key ASC`; an empty slice emits no `SORT`.
    #[tracing::instrument(skip_all, fields(collection = %self.collection))]
    pub async fn run(
        &self,
        terms: Option<&Terms>,
        sort: Option<&[Sort]>,
        inject: Option<&Inject>,
    ) -> Result<Option<T>, SearchError<DB::Error>> {
        let inject = inject.cloned().unwrap_or_default();
        let filters = filter_clause(terms, &self.root);
        let sorts = sort_clause(sort.unwrap_or(&self.default_sort), &self.root);

        let query = Aql::new()
            .literal(format!("FOR {} IN", self.root))
            .collection(self.collection.as_str())
            .append_opt(inject.before_filter.as_ref())
            .literal(filters)
            .append_opt(inject.before_sort.as_ref())
            .literal(sorts)
            .append_opt(inject.before_limit.as_ref())
            .literal("LIMIT 1")
            .append_opt(inject.after.as_ref())
            .literal(format!("RETURN {}", self.root))
            .build();

        debug!(query = %query.query, bind_vars = query.bind_vars.len(), "find");
        let mut cursor = self.db.query(&query).await.map_err(SearchError::Db)?;
        match next_value(&mut cursor).await.map_err(SearchError::Db)? {
            Some(doc) => serde_json::from_value(doc)
                .map(Some)
                .map_err(SearchError::Decode),
            None => Ok(None),
        }
    }

    /// As [`Find::run`], with terms decoded from JSON first.
    pub async fn run_json(
        &self,
        terms: &Json,
        sort: Option<&[Sort]>,
        inject: Option<&Inject>,
    ) -> Result<Option<T>, SearchError<DB::Error>> {
        let terms = Terms::from_json(terms)?;
        self.run(Some(&terms), sort, inject).await
    }
}

impl<'a, DB: AqlDatabase, T: DeserializeOwned> Search<'a, DB, T> {
    pub fn aliases(mut self, root: impl Into<String>, count: impl Into<String>) -> Self {
        self.root = root.into();
        self.count = count.into();
        self
    }

    pub fn with_config(mut self, cfg: &SearchConfig) -> Self {
        self.root = cfg.root_alias.clone();
        self.count = cfg.count_alias.clone();
        self.default_sort = cfg.search_sort.clone();
        self
    }

    /// Decode matched documents into `U` instead.
    pub fn typed<U: DeserializeOwned>(self) -> Search<'a, DB, U> {
        Search {
            db: self.db,
            collection: self.collection,
            root: self.root,
            count: self.count,
            default_sort: self.default_sort,
            _doc: PhantomData,
        }
    }

    /// Search the collection.
    ///
    /// With a limit, a count query runs first to find the true total. Without
    /// one, the total is the number of documents returned. The two round
    /// trips are not atomic; if more documents come back than were counted,
    /// the larger number is reported.
    ///
    /// `sort` defaults to `_rev ASC`; an empty slice emits no `SORT`.
    #[tracing::instrument(skip_all, fields(collection = %self.collection))]
    pub async fn run(
        &self,
        terms: Option<&Terms>,
        limit: Option<Limit>,
        sort: Option<&[Sort]>,
        inject: Option<&Inject>,
    ) -> Result<SearchResult<T>, SearchError<DB::Error>> {
        let inject = inject.cloned().unwrap_or_default();
        let filters = filter_clause(terms, &self.root);
        let sorts = sort_clause(sort.unwrap_or(&self.default_sort), &self.root);
        let limits = limit
            .map(|l| format!("LIMIT {}", parse_limit(&l)))
            .unwrap_or_default();

        let mut total = 0;
        if limit.is_some() {
            let count = count_query(&self.collection, &self.root, &self.count, &filters, Some(&inject));
            total = execute_count(self.db, &count).await?;
        }

        let query = Aql::new()
            .literal(format!("FOR {} IN", self.root))
            .collection(self.collection.as_str())
            .append_opt(inject.before_filter.as_ref())
            .literal(filters)
            .append_opt(inject.before_sort.as_ref())
            .literal(sorts)
            .append_opt(inject.before_limit.as_ref())
            .literal(limits)
            .append_opt(inject.after.as_ref())
            .literal(format!("RETURN {}", self.root))
            .build();

        debug!(query = %query.query, bind_vars = query.bind_vars.len(), "search");
        let cursor = self.db.query(&query).await.map_err(SearchError::Db)?;
        let rows = all_values(cursor).await.map_err(SearchError::Db)?;

        let returned = rows.len() as u64;
        trace!(counted = total, returned, "reconciling search total");
        if returned > total {
            if limit.is_some() {
                warn!(counted = total, returned, "collection changed between count and fetch");
            }
            total = returned;
        }

        let documents = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()
            .map_err(SearchError::Decode)?;

        Ok(SearchResult {
            total,
            documents,
            query,
        })
    }

    /// As [`Search::run`], with terms decoded from JSON first.
    pub async fn run_json(
        &self,
        terms: &Json,
        limit: Option<Limit>,
        sort: Option<&[Sort]>,
        inject: Option<&Inject>,
    ) -> Result<SearchResult<T>, SearchError<DB::Error>> {
        let terms = Terms::from_json(terms)?;
        self.run(Some(&terms), limit, sort, inject).await
    }
}

// -------------------- helpers --------------------

/// `FILTER a FILTER b ...`, or empty when there is nothing to filter on.
fn filter_clause(terms: Option<&Terms>, root: &str) -> String {
    terms
        .map(|t| parse_terms(t, root))
        .unwrap_or_default()
        .iter()
        .map(|f| format!("FILTER {f}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn sort_clause(sorts: &[Sort], root: &str) -> String {
    if sorts.is_empty() {
        return String::new();
    }
    format!("SORT {}", parse_sort(sorts, root).join(", "))
}

fn count_query(
    collection: &str,
    root: &str,
    count: &str,
    filters: &str,
    inject: Option<&Inject>,
) -> AqlQuery {
    let inject = inject.cloned().unwrap_or_default();
    Aql::new()
        .literal(format!("FOR {root} IN"))
        .collection(collection)
        .append_opt(inject.before_filter.as_ref())
        .literal(filters)
        .append_opt(inject.before_limit.as_ref())
        .append_opt(inject.after.as_ref())
        .literal(format!("COLLECT WITH COUNT INTO {count} RETURN {count}"))
        .build()
}

async fn execute_count<DB: AqlDatabase>(
    db: &DB,
    query: &AqlQuery,
) -> Result<u64, SearchError<DB::Error>> {
    debug!(query = %query.query, bind_vars = query.bind_vars.len(), "count");
    let mut cursor = db.query(query).await.map_err(SearchError::Db)?;
    match next_value(&mut cursor).await.map_err(SearchError::Db)? {
        Some(n) => serde_json::from_value(n).map_err(SearchError::Decode),
        None => Ok(0),
    }
}
