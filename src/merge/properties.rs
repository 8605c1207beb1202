use tracing::{info, warn};

use super::{
    context::{ClassMap, MergeContext},
    identifiers::IdentifierKind,
    report::{ExcludedProperty, MigratedProperty, PropertyReport},
};
use crate::{
    ontology::{Iri, Ontology, Property, PropertyKind},
    Result,
};

/// Copies the object and data properties of a source ontology whose class
/// references all resolve in the destination.
#[derive(Debug)]
pub struct PropertyMigrator<'s> {
    source: &'s Ontology,
}

impl<'s> PropertyMigrator<'s> {
    #[must_use]
    pub fn new(source: &'s Ontology) -> Self {
        Self { source }
    }

    /// Migrates every eligible property, object properties first.
    ///
    /// A property is eligible when each of its domain classes, and for object
    /// properties each of its range classes, is either mapped by the class map
    /// or already a class of the destination. A domain or range written as an
    /// anonymous expression never resolves. Ineligible properties are left out
    /// whole and listed in the report.
    ///
    /// # Errors
    ///
    /// Fails when an identifier cannot be built or the destination rejects a
    /// property.
    pub fn migrate(&self, context: &mut MergeContext) -> Result<PropertyReport> {
        let mut report = PropertyReport::default();

        for kind in [PropertyKind::Object, PropertyKind::Data] {
            for property in self.source.properties_of_kind(kind) {
                let unresolved = unresolved_references(context, property);
                let anonymous = property.anonymous_domains() + property.anonymous_ranges();
                if !unresolved.is_empty() || anonymous > 0 {
                    warn!(
                        property = %property.id(),
                        kind = ?kind,
                        unresolved = ?unresolved,
                        anonymous_domains = property.anonymous_domains(),
                        anonymous_ranges = property.anonymous_ranges(),
                        "property_excluded"
                    );
                    report.excluded.push(ExcludedProperty {
                        source: property.id().clone(),
                        kind,
                        unresolved,
                        anonymous_domains: property.anonymous_domains(),
                        anonymous_ranges: property.anonymous_ranges(),
                    });
                    continue;
                }
                report.created.push(Self::migrate_property(context, property)?);
            }
        }

        info!(
            created = report.created.len(),
            excluded = report.excluded.len(),
            "property_migration_finished"
        );
        Ok(report)
    }

    fn migrate_property(context: &mut MergeContext, property: &Property) -> Result<MigratedProperty> {
        let (destination, allocator, class_map) = context.parts_mut();
        let kind = property.kind();
        let id = allocator.allocate(IdentifierKind::from(kind))?;
        let mut migrated = Property::new(id.clone(), kind);

        for domain in property.domains() {
            migrated.add_domain(remap(class_map, domain));
        }
        for range in property.ranges() {
            match kind {
                PropertyKind::Object => migrated.add_range(remap(class_map, range)),
                PropertyKind::Data => migrated.add_range(range.clone()),
            };
        }

        if property.labels().is_empty() {
            migrated.add_label(property.id().local_name());
        } else {
            for label in property.labels() {
                migrated.add_label(label.clone());
            }
        }
        for comment in property.comments() {
            migrated.add_comment(comment.clone());
        }
        migrated.add_comment(format!("Original IRI: {}", property.id()));

        let record = MigratedProperty {
            source: property.id().clone(),
            destination: id,
            kind,
            labels: migrated.labels().to_vec(),
            domains: migrated.domains().iter().cloned().collect(),
            ranges: migrated.ranges().iter().cloned().collect(),
        };
        destination.add_property(migrated)?;
        info!(source = %record.source, destination = %record.destination, kind = ?kind, "property_migrated");
        Ok(record)
    }
}

/// Domain and (object) range classes of `property` that resolve neither
/// through the class map nor to a destination class.
fn unresolved_references(context: &MergeContext, property: &Property) -> Vec<Iri> {
    let ranges = match property.kind() {
        PropertyKind::Object => Some(property.ranges()),
        PropertyKind::Data => None,
    };
    property
        .domains()
        .iter()
        .chain(ranges.into_iter().flatten())
        .filter(|class| {
            !context.class_map().contains(class.as_str())
                && !context.destination().contains_class(class.as_str())
        })
        .cloned()
        .collect()
}

fn remap(class_map: &ClassMap, class: &Iri) -> Iri {
    class_map.get(class.as_str()).unwrap_or(class).clone()
}
