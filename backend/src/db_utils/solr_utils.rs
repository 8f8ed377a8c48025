//! Solr adapter for the [`SearchEngine`] boundary.

use std::{collections::BTreeMap, time::Duration};

use common::{search_query::Scope, search_result::FacetContainer};
use futures::future::BoxFuture;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    config,
    db_utils::{
        index_fields::IS_REFERENCE_SUMMARY,
        search_engine::{
            Collection, Document, EngineGroup, EngineRequest, EngineResponse, FilterClause,
            GroupedDocuments, Highlighting, SearchEngine,
        },
    },
    error::{Error, Result},
};

#[derive(Debug, Deserialize, Default)]
struct RawSolrResponse {
    #[serde(default)]
    response: Option<RawDocList>,
    #[serde(default)]
    facet_counts: Option<RawFacetCounts>,
    #[serde(default)]
    grouped: Option<BTreeMap<String, RawGroupCommand>>,
    #[serde(default)]
    highlighting: Option<Highlighting>,
    #[serde(default)]
    spellcheck: Option<RawSpellcheck>,
}

#[derive(Debug, Deserialize)]
struct RawDocList {
    #[serde(rename = "numFound")]
    num_found: u64,
    #[serde(default)]
    docs: Vec<Map<String, Value>>,
}

#[derive(Debug, Deserialize, Default)]
struct RawFacetCounts {
    #[serde(default)]
    facet_fields: BTreeMap<String, Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct RawGroupCommand {
    matches: u64,
    #[serde(default)]
    ngroups: Option<u64>,
    #[serde(default)]
    groups: Vec<RawGroup>,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    #[serde(rename = "groupValue", default)]
    group_value: Option<String>,
    doclist: RawDocList,
}

#[derive(Debug, Deserialize, Default)]
struct RawSpellcheck {
    #[serde(default)]
    collations: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawPing {
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SolrEngine {
    client: reqwest::Client,
    url: String,
    core: String,
    target_core: String,
    user: Option<String>,
    password: Option<String>,
}

impl SolrEngine {
    pub fn new(config: &config::Solr) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| Error::EngineUnavailable { message: err.to_string() })?;
        Ok(Self {
            client,
            url: config.url.clone(),
            core: config.core.clone(),
            target_core: config.target_core.clone(),
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }

    fn core_url(&self, collection: Collection) -> String {
        let core = match collection {
            Collection::Pathways => &self.core,
            Collection::Targets => &self.target_core,
        };
        format!("{}/{}", self.url, core)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.user {
            Some(user) => builder.basic_auth(user, self.password.as_ref()),
            None => builder,
        }
    }

    pub async fn solr_search(&self, request: &EngineRequest) -> Result<EngineResponse> {
        let url = format!("{}{}", self.core_url(request.collection), request.handler.path());
        let params = solr_params(request);
        let t0 = std::time::Instant::now();

        let response = self
            .authorize(self.client.post(&url).form(&params))
            .send()
            .await
            .map_err(|err| Error::EngineUnavailable { message: format!("{url}: {err}") })?;
        let status = response.status();
        let response_txt = response
            .text()
            .await
            .map_err(|err| Error::EngineUnavailable { message: format!("{url}: {err}") })?;
        if status.is_client_error() || status.is_server_error() {
            return Err(Error::EngineUnavailable {
                message: format!("{url} returned {status}: {response_txt}"),
            });
        }

        let dt_ms = t0.elapsed().as_millis() as u64;
        debug!(handler = request.handler.path(), len = response_txt.len(), dt_ms, "search response");
        parse_solr_response(&response_txt)
    }

    pub async fn solr_ping(&self) -> bool {
        let url = format!("{}/admin/ping", self.core_url(Collection::Pathways));
        let response = match self.authorize(self.client.get(&url).query(&[("wt", "json")])).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!("Search engine ping failed: {err}");
                return false;
            }
        };
        if !response.status().is_success() {
            warn!("Search engine ping returned {}", response.status());
            return false;
        }
        match response.json::<RawPing>().await {
            Ok(ping) => ping.status.as_deref() == Some("OK"),
            Err(err) => {
                warn!("Search engine ping answered garbage: {err}");
                false
            }
        }
    }
}

impl SearchEngine for SolrEngine {
    fn execute<'a>(&'a self, request: &'a EngineRequest) -> BoxFuture<'a, Result<EngineResponse>> {
        Box::pin(self.solr_search(request))
    }

    fn ping(&self) -> BoxFuture<'_, bool> {
        Box::pin(self.solr_ping())
    }
}

/// Quotes `value` as a phrase of the standard query syntax.
pub fn quote_phrase(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// `field:("a" OR "b")` over the non-blank values, `None` when none are left.
pub fn any_of_clause<S: AsRef<str>>(field: &str, values: &[S]) -> Option<String> {
    let values = values
        .iter()
        .map(|value: &S| -> &str { value.as_ref() })
        .filter(|value| !value.trim().is_empty())
        .map(quote_phrase)
        .collect::<Vec<_>>();
    if values.is_empty() {
        return None;
    }
    Some(format!("{field}:({})", values.join(" OR ")))
}

fn render_filter(filter: &FilterClause) -> Option<String> {
    match filter {
        FilterClause::AnyOf { field, values, tag } => {
            let clause = any_of_clause(field, values)?;
            Some(match tag {
                Some(tag) => format!("{{!tag={tag}}}{clause}"),
                None => clause,
            })
        }
        FilterClause::Raw(raw) if raw.trim().is_empty() => None,
        FilterClause::Raw(raw) => Some(raw.clone()),
    }
}

fn scope_filter(scope: Scope) -> Option<String> {
    match scope {
        Scope::ReferenceEntity => Some(format!("-{IS_REFERENCE_SUMMARY}:false")),
        Scope::PhysicalEntity => Some(format!("-{IS_REFERENCE_SUMMARY}:true")),
        Scope::Both => None,
    }
}

/// Form parameters sent for `request`.
pub fn solr_params(request: &EngineRequest) -> Vec<(String, String)> {
    let mut params = vec![("wt".to_string(), "json".to_string())];
    let text_param = if request.handler.is_spellcheck() { "spellcheck.q" } else { "q" };
    params.push((text_param.to_string(), request.query.clone()));
    if let Some(def_type) = request.parser_type.def_type() {
        params.push(("defType".to_string(), def_type.to_string()));
    }

    for fq in request.filters.iter().filter_map(render_filter) {
        params.push(("fq".to_string(), fq));
    }
    if let Some(fq) = request.scope.and_then(scope_filter) {
        params.push(("fq".to_string(), fq));
    }

    if !request.facets.is_empty() {
        params.push(("facet".to_string(), "true".to_string()));
        for facet in &request.facets {
            let field = match facet.exclude_tag {
                Some(tag) => format!("{{!ex={tag}}}{}", facet.field),
                None => facet.field.to_string(),
            };
            params.push(("facet.field".to_string(), field));
        }
    }

    if let Some(start) = request.start {
        params.push(("start".to_string(), start.to_string()));
    }
    if let Some(rows) = request.rows {
        params.push(("rows".to_string(), rows.to_string()));
    }
    if !request.fields.is_empty() {
        params.push(("fl".to_string(), request.fields.join(",")));
    }
    if let Some(sort) = &request.sort {
        params.push(("sort".to_string(), sort.clone()));
    }
    if let Some(min_match) = request.min_match {
        params.push(("mm".to_string(), min_match.to_string()));
    }

    if let Some(group) = &request.group {
        params.push(("group".to_string(), "true".to_string()));
        params.push(("group.field".to_string(), group.field.to_string()));
        params.push(("group.ngroups".to_string(), "true".to_string()));
        if let Some(offset) = group.offset {
            params.push(("group.offset".to_string(), offset.to_string()));
        }
        if let Some(limit) = group.limit {
            params.push(("group.limit".to_string(), limit.to_string()));
        }
    }
    params
}

pub fn parse_solr_response(body: &str) -> Result<EngineResponse> {
    let raw: RawSolrResponse = serde_json::from_str(body)
        .map_err(|err| Error::InvalidEngineResponse { message: err.to_string() })?;

    let mut response = EngineResponse::default();
    if let Some(doc_list) = raw.response {
        response.num_found = doc_list.num_found;
        response.documents = doc_list.docs.into_iter().map(Document).collect();
    }

    for (field, flat) in raw.facet_counts.unwrap_or_default().facet_fields {
        let values = parse_facet_values(&field, &flat)?;
        response.facet_fields.insert(field, values);
    }

    // A request groups on a single field.
    if let Some(command) = raw.grouped.and_then(|grouped| grouped.into_values().next()) {
        let groups = command
            .groups
            .into_iter()
            .map(|group| EngineGroup {
                group_value: group.group_value,
                num_found: group.doclist.num_found,
                documents: group.doclist.docs.into_iter().map(Document).collect(),
            })
            .collect::<Vec<_>>();
        response.grouped = Some(GroupedDocuments {
            matches: command.matches,
            ngroups: command.ngroups.unwrap_or(groups.len() as u64),
            groups,
        });
    }

    response.highlighting = raw.highlighting;
    response.collations = parse_collations(raw.spellcheck.unwrap_or_default().collations);
    Ok(response)
}

/// Facet fields come as a flat `[name, count, name, count, ...]` list.
fn parse_facet_values(field: &str, flat: &[Value]) -> Result<Vec<FacetContainer>> {
    if flat.len() % 2 != 0 {
        return Err(Error::InvalidEngineResponse {
            message: format!("facet field {field} has an odd number of elements"),
        });
    }
    flat.chunks(2)
        .map(|pair| match (&pair[0], pair[1].as_u64()) {
            (Value::String(name), Some(count)) => Ok(FacetContainer::new(name.clone(), count)),
            _ => Err(Error::InvalidEngineResponse {
                message: format!("facet field {field} holds {pair:?}"),
            }),
        })
        .collect()
}

/// Collations are either `"collation", <text>` pairs or objects carrying a
/// `collationQuery`.
fn parse_collations(raw: Vec<Value>) -> Vec<String> {
    let mut collations = Vec::new();
    let mut values = raw.into_iter();
    while let Some(value) = values.next() {
        let text = match value {
            Value::String(key) if key == "collation" => values.next().and_then(collation_text),
            value @ Value::Object(_) => collation_text(value),
            _ => None,
        };
        collations.extend(text);
    }
    collations
}

fn collation_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Object(map) => map.get("collationQuery").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}


#[cfg(test)]
mod tests {
    use common::search_query::ParserType;
    use serde_json::json;

    use super::*;
    use crate::db_utils::search_engine::{FacetRequest, GroupDirective, RequestHandler};

    fn values(params: &[(String, String)], key: &str) -> Vec<String> {
        params.iter().filter(|(k, _)| k == key).map(|(_, v)| v.clone()).collect()
    }

    #[test]
    fn filters_are_tagged_and_blank_values_dropped() {
        let mut request = EngineRequest::new(RequestHandler::Facet, "PTEN");
        request.parser_type = ParserType::Dismax;
        request.scope = Some(Scope::ReferenceEntity);
        request.filters = vec![
            FilterClause::AnyOf {
                field: "species_facet".to_string(),
                values: vec!["Homo sapiens".to_string(), "".to_string()],
                tag: Some("sf"),
            },
            FilterClause::AnyOf { field: "type_facet".to_string(), values: vec!["  ".to_string()], tag: Some("tf") },
        ];
        request.facets = vec![FacetRequest { field: "species_facet", exclude_tag: Some("sf") }];

        let params = solr_params(&request);
        assert_eq!(values(&params, "q"), vec!["PTEN"]);
        assert_eq!(values(&params, "defType"), vec!["dismax"]);
        assert_eq!(
            values(&params, "fq"),
            vec!["{!tag=sf}species_facet:(\"Homo sapiens\")", "-isReferenceSummary:false"]
        );
        assert_eq!(values(&params, "facet.field"), vec!["{!ex=sf}species_facet"]);
    }

    #[test]
    fn spellcheck_handlers_and_groups() {
        let mut request = EngineRequest::new(RequestHandler::Suggest, "apop");
        request.scope = Some(Scope::Both);
        assert_eq!(values(&solr_params(&request), "spellcheck.q"), vec!["apop"]);
        assert!(values(&solr_params(&request), "fq").is_empty());

        let mut request = EngineRequest::new(RequestHandler::Browse, "apoptosis");
        request.group = Some(GroupDirective { field: "type_facet", offset: Some(14), limit: Some(7) });
        let params = solr_params(&request);
        assert_eq!(values(&params, "group.field"), vec!["type_facet"]);
        assert_eq!(values(&params, "group.offset"), vec!["14"]);
        assert_eq!(values(&params, "group.limit"), vec!["7"]);
    }

    #[test]
    fn sort_and_minimum_match_are_passed_through() {
        let mut request = EngineRequest::new(RequestHandler::Search, "stId:\"R-ICO-012345\"");
        request.sort = Some("iconName_sort asc".to_string());
        request.min_match = Some("100%");
        let params = solr_params(&request);
        assert_eq!(values(&params, "sort"), vec!["iconName_sort asc"]);
        assert_eq!(values(&params, "mm"), vec!["100%"]);
        assert!(values(&solr_params(&EngineRequest::new(RequestHandler::IconFacet, "*:*")), "sort").is_empty());
    }

    #[test]
    fn phrases_are_escaped() {
        assert_eq!(quote_phrase(r#"a "b" \c"#), r#""a \"b\" \\c""#);
        assert_eq!(any_of_clause::<&str>("dbId", &[]), None);
        assert_eq!(any_of_clause("dbId", &["1", "2"]).as_deref(), Some(r#"dbId:("1" OR "2")"#));
    }

    #[test]
    fn parses_grouped_facets_and_highlighting() {
        let body = json!({
            "grouped": { "type_facet": {
                "matches": 12,
                "ngroups": 2,
                "groups": [
                    { "groupValue": "Protein", "doclist": { "numFound": 10, "docs": [{ "dbId": "1" }] } },
                    { "groupValue": "Pathway", "doclist": { "numFound": 2, "docs": [] } }
                ]
            }},
            "facet_counts": { "facet_fields": { "type_facet": ["Protein", 10, "Pathway", 2] } },
            "highlighting": { "1": { "name": ["<span class=\"highlighting\">PTEN</span>"] } },
        })
        .to_string();

        let response = parse_solr_response(&body).unwrap();
        let grouped = response.grouped.unwrap();
        assert_eq!(grouped.matches, 12);
        assert_eq!(grouped.ngroups, 2);
        assert_eq!(grouped.groups[0].group_value.as_deref(), Some("Protein"));
        assert_eq!(grouped.groups[0].num_found, 10);
        assert_eq!(response.facet_fields["type_facet"][1], FacetContainer::new("Pathway", 2));
        assert!(response.highlighting.unwrap()["1"].contains_key("name"));
    }

    #[test]
    fn parses_both_collation_shapes() {
        let flat = json!({ "spellcheck": { "collations": ["collation", "apoptosis", "collation", { "collationQuery": "apoptotic" }] } });
        let response = parse_solr_response(&flat.to_string()).unwrap();
        assert_eq!(response.collations, vec!["apoptosis", "apoptotic"]);
    }

    #[test]
    fn rejects_broken_facets_and_bodies() {
        let odd = json!({ "facet_counts": { "facet_fields": { "type_facet": ["Protein"] } } });
        assert!(matches!(parse_solr_response(&odd.to_string()), Err(Error::InvalidEngineResponse { .. })));
        assert!(matches!(parse_solr_response("<html>"), Err(Error::InvalidEngineResponse { .. })));
    }
}
