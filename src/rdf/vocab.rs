//! IRIs of the vocabularies the catalog is written in.

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";

pub mod dcat {
    pub const DATASET: &str = "http://www.w3.org/ns/dcat#Dataset";
    pub const KEYWORD: &str = "http://www.w3.org/ns/dcat#keyword";
    pub const START_DATE: &str = "http://www.w3.org/ns/dcat#startDate";
    pub const END_DATE: &str = "http://www.w3.org/ns/dcat#endDate";
}

pub mod dct {
    pub const IDENTIFIER: &str = "http://purl.org/dc/terms/identifier";
    pub const TITLE: &str = "http://purl.org/dc/terms/title";
    pub const DESCRIPTION: &str = "http://purl.org/dc/terms/description";
    pub const TEMPORAL: &str = "http://purl.org/dc/terms/temporal";
    pub const CREATOR: &str = "http://purl.org/dc/terms/creator";
    pub const PUBLISHER: &str = "http://purl.org/dc/terms/publisher";
    pub const LICENSE: &str = "http://purl.org/dc/terms/license";
    pub const FORMAT: &str = "http://purl.org/dc/terms/format";
    pub const KEYWORD: &str = "http://purl.org/dc/terms/keyword";
}

pub mod foaf {
    pub const NAME: &str = "http://xmlns.com/foaf/0.1/name";
    pub const MBOX: &str = "http://xmlns.com/foaf/0.1/mbox";
}

pub mod prov {
    pub const AGENT: &str = "http://www.w3.org/ns/prov#Agent";
    pub const ACTIVITY: &str = "http://www.w3.org/ns/prov#Activity";
    pub const HAD_MEMBER: &str = "http://www.w3.org/ns/prov#hadMember";
    pub const STARTED_AT_TIME: &str = "http://www.w3.org/ns/prov#startedAtTime";
    pub const ENDED_AT_TIME: &str = "http://www.w3.org/ns/prov#endedAtTime";
    pub const WAS_ASSOCIATED_WITH: &str = "http://www.w3.org/ns/prov#wasAssociatedWith";
}

pub mod sosa {
    pub const SENSOR: &str = "http://www.w3.org/ns/sosa/Sensor";
    pub const OBSERVABLE_PROPERTY: &str = "http://www.w3.org/ns/sosa/ObservableProperty";
    pub const IS_HOSTED_BY: &str = "http://www.w3.org/ns/sosa/isHostedBy";
}

pub mod qudt {
    pub const HAS_UNIT: &str = "http://qudt.org/schema/qudt/hasUnit";
}

/// Local datacenter namespace used to mint activity IRIs.
pub const DCM: &str = "http://areasciencepark.it/datacenter/ns#";
