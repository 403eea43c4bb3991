use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use oxigraph::io::RdfFormat;
use oxigraph::model::{Subject, Term};
use oxigraph::store::Store;

use super::vocab::RDF_TYPE;
use crate::errors::{IngestError, IngestResult};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RdfTerm {
    Iri(String),
    Blank(String),
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl RdfTerm {
    pub fn iri(value: impl Into<String>) -> Self {
        RdfTerm::Iri(value.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        RdfTerm::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// Lexical form: the IRI, the blank node id, or the literal value.
    pub fn value(&self) -> &str {
        match self {
            RdfTerm::Iri(iri) => iri,
            RdfTerm::Blank(id) => id,
            RdfTerm::Literal { value, .. } => value,
        }
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            RdfTerm::Iri(iri) => Some(iri),
            _ => None,
        }
    }
}

/// Triples indexed by subject, then predicate.
///
/// Subjects iterate in a stable order so ingestion output does not depend on
/// the order triples appear in the document.
#[derive(Debug, Default)]
pub struct CatalogGraph {
    index: BTreeMap<RdfTerm, BTreeMap<String, Vec<RdfTerm>>>,
    triples: usize,
}

impl CatalogGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_turtle_file(path: &Path) -> IngestResult<Self> {
        let file = File::open(path)?;
        Self::from_turtle_reader(BufReader::new(file))
    }

    pub fn from_turtle_str(content: &str) -> IngestResult<Self> {
        Self::from_turtle_reader(content.as_bytes())
    }

    fn from_turtle_reader(reader: impl Read) -> IngestResult<Self> {
        let store = Store::new().map_err(|e| IngestError::RdfLoad(e.to_string()))?;
        store
            .load_from_reader(RdfFormat::Turtle, reader)
            .map_err(|e| IngestError::RdfLoad(e.to_string()))?;

        let mut graph = Self::new();
        for quad in store.iter() {
            let quad = quad.map_err(|e| IngestError::RdfLoad(e.to_string()))?;
            let Some(subject) = convert_subject(&quad.subject) else {
                continue;
            };
            let Some(object) = convert_term(&quad.object) else {
                continue;
            };
            graph.insert(subject, quad.predicate.as_str(), object);
        }

        Ok(graph)
    }

    pub fn insert(&mut self, subject: RdfTerm, predicate: &str, object: RdfTerm) {
        let objects = self
            .index
            .entry(subject)
            .or_default()
            .entry(predicate.to_string())
            .or_default();
        if !objects.contains(&object) {
            objects.push(object);
            objects.sort();
            self.triples += 1;
        }
    }

    /// Number of distinct triples
    pub fn len(&self) -> usize {
        self.triples
    }

    pub fn is_empty(&self) -> bool {
        self.triples == 0
    }

    /// All subjects carrying `rdf:type <class>`, in stable order.
    pub fn subjects_of_type(&self, class: &str) -> Vec<&RdfTerm> {
        self.index
            .keys()
            .filter(|subject| self.has_type(subject, class))
            .collect()
    }

    pub fn has_type(&self, subject: &RdfTerm, class: &str) -> bool {
        self.objects(subject, RDF_TYPE)
            .iter()
            .any(|object| object.as_iri() == Some(class))
    }

    pub fn types(&self, subject: &RdfTerm) -> Vec<&str> {
        self.objects(subject, RDF_TYPE)
            .iter()
            .filter_map(RdfTerm::as_iri)
            .collect()
    }

    pub fn objects(&self, subject: &RdfTerm, predicate: &str) -> &[RdfTerm] {
        self.index
            .get(subject)
            .and_then(|predicates| predicates.get(predicate))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn object(&self, subject: &RdfTerm, predicate: &str) -> Option<&RdfTerm> {
        self.objects(subject, predicate).first()
    }

    /// Lexical value of the first object, whatever its kind.
    pub fn value(&self, subject: &RdfTerm, predicate: &str) -> Option<&str> {
        self.object(subject, predicate).map(RdfTerm::value)
    }

    /// Follow `first` from `subject` and read `second` on the node reached.
    pub fn path_value(&self, subject: &RdfTerm, first: &str, second: &str) -> Option<&str> {
        self.objects(subject, first)
            .iter()
            .find_map(|node| self.value(node, second))
    }
}

fn convert_subject(subject: &Subject) -> Option<RdfTerm> {
    match subject {
        Subject::NamedNode(node) => Some(RdfTerm::Iri(node.as_str().to_string())),
        Subject::BlankNode(node) => Some(RdfTerm::Blank(node.as_str().to_string())),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

fn convert_term(term: &Term) -> Option<RdfTerm> {
    match term {
        Term::NamedNode(node) => Some(RdfTerm::Iri(node.as_str().to_string())),
        Term::BlankNode(node) => Some(RdfTerm::Blank(node.as_str().to_string())),
        Term::Literal(literal) => Some(RdfTerm::Literal {
            value: literal.value().to_string(),
            datatype: Some(literal.datatype().as_str().to_string()),
            language: literal.language().map(str::to_string),
        }),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::vocab::{dcat, dct, foaf};

    const SAMPLE: &str = r#"
@prefix dcat: <http://www.w3.org/ns/dcat#> .
@prefix dct: <http://purl.org/dc/terms/> .
@prefix foaf: <http://xmlns.com/foaf/0.1/> .
@prefix ex: <http://example.org/> .

ex:b a dcat:Dataset ;
    dct:title "Second" .

ex:a a dcat:Dataset ;
    dct:title "First" ;
    dct:creator [ foaf:name "Ops Team" ] ;
    dcat:keyword "hpc", "cpu" .
"#;

    #[test]
    fn test_load_and_index() {
        let graph = CatalogGraph::from_turtle_str(SAMPLE).unwrap();
        assert_eq!(graph.len(), 8);

        let datasets = graph.subjects_of_type(dcat::DATASET);
        assert_eq!(
            datasets,
            vec![
                &RdfTerm::iri("http://example.org/a"),
                &RdfTerm::iri("http://example.org/b")
            ]
        );
        assert_eq!(graph.value(datasets[0], dct::TITLE), Some("First"));
        assert_eq!(graph.objects(datasets[0], dcat::KEYWORD).len(), 2);
        assert!(graph.objects(datasets[1], dcat::KEYWORD).is_empty());
    }

    #[test]
    fn test_blank_node_traversal() {
        let graph = CatalogGraph::from_turtle_str(SAMPLE).unwrap();
        let subject = RdfTerm::iri("http://example.org/a");
        assert_eq!(
            graph.path_value(&subject, dct::CREATOR, foaf::NAME),
            Some("Ops Team")
        );
        assert_eq!(graph.path_value(&subject, dct::PUBLISHER, foaf::NAME), None);
    }

    #[test]
    fn test_duplicate_triples_are_counted_once() {
        let mut graph = CatalogGraph::new();
        let subject = RdfTerm::iri("http://example.org/s");
        graph.insert(subject.clone(), dct::TITLE, RdfTerm::literal("x"));
        graph.insert(subject.clone(), dct::TITLE, RdfTerm::literal("x"));
        assert_eq!(graph.len(), 1);
        assert!(!graph.is_empty());
    }

    #[test]
    fn test_invalid_turtle_is_an_error() {
        let result = CatalogGraph::from_turtle_str("this is not turtle");
        assert!(matches!(result, Err(IngestError::RdfLoad(_))));
    }
}
