//! Fire-and-forget reporting of targets and unmatched searches.

use std::collections::{BTreeMap, BTreeSet};

use common::{
    search_const::{REPORT_IP_ADDRESS, REPORT_RELEASE_VERSION, REPORT_USER_AGENT},
    search_query::Query,
    target_result::TargetResult,
};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::{
    config,
    error::{Error, Result},
};

/// Receives search outcomes worth recording. Implementations must return
/// without waiting on the report to be delivered.
pub trait OutcomeReporter: Send + Sync {
    fn report_not_found(&self, query: &Query);

    fn report_targets(&self, query: &Query, targets: Vec<TargetResult>);
}

/// Reports what an unsuccessful search resolved to. Queries without report
/// metadata are never reported.
pub fn dispatch_report(reporter: &dyn OutcomeReporter, query: &Query, targets: &BTreeSet<TargetResult>) {
    if query.report_info().is_none() {
        debug!(query = query.query(), "No report metadata, skipping report");
        return;
    }
    if targets.is_empty() {
        reporter.report_not_found(query);
        return;
    }

    let (confirmed, unmatched): (Vec<TargetResult>, Vec<TargetResult>) =
        targets.iter().cloned().partition(|target| target.is_target);
    if !confirmed.is_empty() {
        reporter.report_targets(query, confirmed);
    }
    if !unmatched.is_empty() {
        let terms = unmatched.iter().map(|target| target.term.as_str()).collect::<Vec<_>>().join(" ");
        reporter.report_not_found(&query.rebuild().query(terms).build());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Targets,
    NotFound,
}

impl ReportKind {
    fn path(self) -> &'static str {
        match self {
            ReportKind::Targets => "targets",
            ReportKind::NotFound => "notfound",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct ReportEntity {
    term: String,
    resource: String,
}

/// Posts reports to the reporting service on spawned tasks.
#[derive(Debug, Clone)]
pub struct HttpReporter {
    client: reqwest::Client,
    url: String,
    user: Option<String>,
    password: Option<String>,
}

impl HttpReporter {
    pub fn new(config: &config::Report) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.url.clone(),
            user: config.user.clone(),
            password: config.password.clone(),
        }
    }

    pub async fn send_report<B: Serialize + ?Sized>(
        &self,
        kind: ReportKind,
        report_info: &BTreeMap<String, String>,
        body: &B,
    ) -> Result<()> {
        let url = format!("{}/report/search/{}", self.url, kind.path());
        let info = |key: &str| report_info.get(key).cloned().unwrap_or_default();
        let params = [
            ("releaseNumber", info(REPORT_RELEASE_VERSION)),
            ("ip", info(REPORT_IP_ADDRESS)),
            ("agent", info(REPORT_USER_AGENT)),
        ];

        let mut builder = self.client.post(&url).query(&params).json(body);
        if let Some(user) = &self.user {
            builder = builder.basic_auth(user, self.password.as_ref());
        }
        let response = builder.send().await.map_err(|err| {
            let message = if err.is_connect() {
                "[REP002] Report service is unavailable".to_string()
            } else {
                format!("[REP003] An unexpected error has occurred when saving a report: {err}")
            };
            Error::ReportingFailure { message }
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::ReportingFailure {
                message: format!(
                    "[REP001] The url {url} returned the code {} and the report hasn't been created.",
                    status.as_u16()
                ),
            });
        }
        Ok(())
    }

    fn spawn_report<B: Serialize + Send + Sync + 'static>(&self, kind: ReportKind, query: &Query, body: B) {
        let Some(report_info) = query.report_info().cloned() else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            error!("[REP003] No runtime to deliver the report on");
            return;
        };
        let reporter = self.clone();
        runtime.spawn(async move {
            if let Err(err) = reporter.send_report(kind, &report_info, &body).await {
                error!("{err}");
            }
        });
    }
}

impl OutcomeReporter for HttpReporter {
    fn report_not_found(&self, query: &Query) {
        let body = ReportEntity { term: query.original_query().to_string(), resource: String::new() };
        self.spawn_report(ReportKind::NotFound, query, body);
    }

    fn report_targets(&self, query: &Query, targets: Vec<TargetResult>) {
        let body = targets
            .into_iter()
            .map(|target| ReportEntity { term: target.term, resource: target.resource.unwrap_or_default() })
            .collect::<Vec<_>>();
        self.spawn_report(ReportKind::Targets, query, body);
    }
}

/// Stands in for the reporting service when it is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledReporter;

impl OutcomeReporter for DisabledReporter {
    fn report_not_found(&self, query: &Query) {
        info!(query = query.original_query(), "Search found nothing");
    }

    fn report_targets(&self, query: &Query, targets: Vec<TargetResult>) {
        info!(query = query.original_query(), targets = targets.len(), "Search matched curated targets");
    }
}
