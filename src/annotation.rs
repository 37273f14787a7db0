use std::collections::{BTreeMap, BTreeSet, HashSet};

use derive_new::new;
use tracing::debug;

use crate::error::{PathwayError, Result};

/// A single gene-to-pathway membership
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, new)]
pub struct AnnotationRecord {
    pub gene_id: String,
    pub pathway_id: String,
}

/// The gene-to-pathway membership relation
///
/// Pathways are kept in lexicographic order, so every listing derived from the
/// index is reproducible across runs. The index is never mutated after
/// construction; [`AnnotationIndex::restrict_to_genes`] returns a new index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationIndex {
    pathways: BTreeMap<String, BTreeSet<String>>,
}
impl AnnotationIndex {
    /// Build the index from annotation records
    ///
    /// Repeated records are ignored. Records with an empty gene or pathway id
    /// are rejected.
    pub fn build<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = AnnotationRecord>,
    {
        let mut pathways: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for record in records {
            if record.gene_id.is_empty() || record.pathway_id.is_empty() {
                return Err(PathwayError::InvalidValue(format!(
                    "annotation record with empty identifier: gene='{}' pathway='{}'",
                    record.gene_id, record.pathway_id
                )));
            }
            pathways
                .entry(record.pathway_id)
                .or_default()
                .insert(record.gene_id);
        }
        let index = Self { pathways };
        debug!(
            "Built annotation index with {} pathways over {} genes",
            index.n_pathways(),
            index.n_genes()
        );
        Ok(index)
    }

    /// Keep only memberships whose gene is in `gene_ids`
    ///
    /// Pathways left without any member are dropped.
    pub fn restrict_to_genes<'a, I>(&self, gene_ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let keep: HashSet<&str> = gene_ids.into_iter().collect();
        let pathways = self
            .pathways
            .iter()
            .filter_map(|(pathway, genes)| {
                let members = genes
                    .iter()
                    .filter(|gene| keep.contains(gene.as_str()))
                    .cloned()
                    .collect::<BTreeSet<_>>();
                (!members.is_empty()).then(|| (pathway.clone(), members))
            })
            .collect();
        Self { pathways }
    }

    pub fn genes_of_pathway(&self, pathway_id: &str) -> Result<&BTreeSet<String>> {
        self.pathways
            .get(pathway_id)
            .ok_or_else(|| PathwayError::NotFound(pathway_id.to_string()))
    }

    /// All pathway ids, sorted lexicographically
    pub fn all_pathway_ids(&self) -> Vec<&str> {
        self.pathways.keys().map(|p| p.as_str()).collect()
    }

    /// Every gene annotated to at least one pathway
    pub fn genes(&self) -> BTreeSet<&str> {
        self.pathways
            .values()
            .flat_map(|genes| genes.iter().map(|g| g.as_str()))
            .collect()
    }

    pub fn contains_pathway(&self, pathway_id: &str) -> bool {
        self.pathways.contains_key(pathway_id)
    }

    pub fn n_pathways(&self) -> usize {
        self.pathways.len()
    }

    pub fn n_genes(&self) -> usize {
        self.genes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pathways.is_empty()
    }
}
