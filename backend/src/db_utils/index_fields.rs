//! Field names of the pathway index.

pub use common::search_const::{
    OCCURRENCES_FIELD as OCCURRENCES, OCCURRENCES_WITH_INTERACTOR_FIELD as OCCURRENCES_WITH_INTERACTOR,
};

pub const DB_ID: &str = "dbId";
pub const ST_ID: &str = "stId";
pub const NAME: &str = "name";
pub const TYPE: &str = "type";
pub const EXACT_TYPE: &str = "exactType";
pub const SPECIES: &str = "species";
pub const SUMMATION: &str = "summation";
pub const INFERRED_SUMMATION: &str = "inferredSummation";
pub const REFERENCE_NAME: &str = "referenceName";
pub const REFERENCE_IDENTIFIERS: &str = "referenceIdentifiers";
pub const COMPARTMENT_NAME: &str = "compartmentName";
pub const COMPARTMENT_ACCESSION: &str = "compartmentAccession";
pub const IS_DISEASE: &str = "isDisease";
pub const HAS_REFERENCE_ENTITY: &str = "hasReferenceEntity";
pub const HAS_EHLD: &str = "hasEHLD";
pub const DATABASE_NAME: &str = "databaseName";
pub const REFERENCE_URL: &str = "referenceURL";
pub const REGULATOR: &str = "regulator";
pub const REGULATOR_ID: &str = "regulatorId";
pub const REGULATED_ENTITY: &str = "regulatedEntity";
pub const REGULATED_ENTITY_ID: &str = "regulatedEntityId";
pub const AUTHORED_PATHWAYS: &str = "authoredPathways";
pub const AUTHORED_REACTIONS: &str = "authoredReactions";
pub const REVIEWED_PATHWAYS: &str = "reviewedPathways";
pub const REVIEWED_REACTIONS: &str = "reviewedReactions";
pub const ORCID_ID: &str = "orcidId";
pub const FIREWORKS_SPECIES: &str = "fireworksSpecies";
pub const DELETED: &str = "deleted";
pub const IS_REFERENCE_SUMMARY: &str = "isReferenceSummary";
pub const DIAGRAMS: &str = "diagrams";
pub const LLPS: &str = "llps";
pub const PHYSICAL_ENTITIES_DB_ID: &str = "physicalEntitiesDbId";

// Icon library.
pub const ICON_NAME: &str = "iconName";
pub const ICON_NAME_SORT: &str = "iconName_sort";
pub const ICON_CATEGORIES: &str = "iconCategories";
pub const ICON_CURATOR_NAME: &str = "iconCuratorName";
pub const ICON_CURATOR_ORCID_ID: &str = "iconCuratorOrcidId";
pub const ICON_CURATOR_URL: &str = "iconCuratorUrl";
pub const ICON_DESIGNER_NAME: &str = "iconDesignerName";
pub const ICON_DESIGNER_URL: &str = "iconDesignerUrl";
pub const ICON_DESIGNER_ORCID_ID: &str = "iconDesignerOrcidId";
pub const ICON_REFERENCES: &str = "iconReferences";
pub const ICON_PHYSICAL_ENTITIES: &str = "iconPhysicalEntities";
pub const ICON_EHLDS: &str = "iconEhlds";

// Curated targets index.
pub const TARGET_IDENTIFIER: &str = "identifier";
pub const TARGET_ACCESSIONS: &str = "accessions";
pub const TARGET_GENE_NAMES: &str = "geneNames";
pub const TARGET_SYNONYMS: &str = "synonyms";
pub const TARGET_RESOURCE: &str = "resource";
