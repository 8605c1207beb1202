use std::{fs, path::Path};

use owl_merge::{
    merge::{load_tasks, MergeOrchestrator, MergeRequest, MergeTask, TaskOutcome},
    ontology::{
        Iri, Ontology, OntologyStore, PropertyKind, RdfFileStore, StructuralReasoner,
    },
    Error,
};

const BASE_IRI: &str = "http://base.example/onto#";

const BASE: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:owl="http://www.w3.org/2002/07/owl#">
  <owl:Ontology rdf:about="http://base.example/onto"/>
  <owl:Class rdf:about="http://base.example/onto#00001">
    <rdfs:label>Disorder</rdfs:label>
  </owl:Class>
</rdf:RDF>
"#;

const IMPORT: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:owl="http://www.w3.org/2002/07/owl#"
         xmlns:skos="http://www.w3.org/2004/02/skos/core#">
  <owl:Ontology rdf:about="http://import.example/onto"/>
  <owl:Class rdf:about="http://import.example/onto#10">
    <rdfs:label>infection</rdfs:label>
    <skos:definition>Invasion of the body by pathogens.</skos:definition>
  </owl:Class>
  <owl:Class rdf:about="http://import.example/onto#11">
    <rdfs:subClassOf rdf:resource="http://import.example/onto#10"/>
    <rdfs:label>viral_infection</rdfs:label>
  </owl:Class>
  <owl:Class rdf:about="http://import.example/onto#12">
    <rdfs:subClassOf rdf:resource="http://import.example/onto#10"/>
    <rdfs:label>fever_of_unknown_origin</rdfs:label>
  </owl:Class>
  <owl:Class rdf:about="http://import.example/onto#13">
    <rdfs:subClassOf rdf:resource="http://import.example/onto#11"/>
    <rdfs:subClassOf rdf:resource="http://import.example/onto#12"/>
    <rdfs:label>viral_fever</rdfs:label>
  </owl:Class>
  <owl:Class rdf:about="http://import.example/onto#20">
    <rdfs:label>pathogen</rdfs:label>
  </owl:Class>
  <owl:ObjectProperty rdf:about="http://import.example/onto#causes">
    <rdfs:domain rdf:resource="http://import.example/onto#10"/>
    <rdfs:range rdf:resource="http://base.example/onto#00001"/>
  </owl:ObjectProperty>
  <owl:ObjectProperty rdf:about="http://import.example/onto#carriedBy">
    <rdfs:domain rdf:resource="http://import.example/onto#10"/>
    <rdfs:range rdf:resource="http://import.example/onto#20"/>
  </owl:ObjectProperty>
  <owl:DatatypeProperty rdf:about="http://import.example/onto#onsetDays">
    <rdfs:label>onset days</rdfs:label>
    <rdfs:domain rdf:resource="http://import.example/onto#11"/>
    <rdfs:range rdf:resource="http://www.w3.org/2001/XMLSchema#integer"/>
  </owl:DatatypeProperty>
</rdf:RDF>
"#;

fn iri(text: &str) -> Iri {
    Iri::new(text).expect("valid iri")
}

fn base(local: &str) -> Iri {
    iri(&format!("{BASE_IRI}{local}"))
}

fn task(import: &str, base_parent: &str, output: &str) -> MergeTask {
    MergeTask {
        import_class_iri: import.to_string(),
        base_parent_iri: base_parent.to_string(),
        output_file: output.into(),
    }
}

fn request(dir: &Path, base_file: &str, tasks: Vec<MergeTask>) -> MergeRequest {
    MergeRequest {
        base: dir.join(base_file),
        import: dir.join("import.owl"),
        tasks,
        base_iri: iri(BASE_IRI),
        output_dir: dir.join("out"),
        final_output: "merged.owl".into(),
    }
}

fn fixtures() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("base.owl"), BASE).expect("base fixture");
    fs::write(dir.path().join("import.owl"), IMPORT).expect("import fixture");
    dir
}

fn load(path: &Path) -> Ontology {
    RdfFileStore::new().load(path).expect("load ontology").0
}

#[test]
fn merges_subtree_and_properties_end_to_end() {
    let dir = fixtures();
    let store = RdfFileStore::new();
    let request = request(
        dir.path(),
        "base.owl",
        vec![task(
            "http://import.example/onto#10",
            "http://base.example/onto#00001",
            "step1.owl",
        )],
    );

    let report = MergeOrchestrator::new(&store)
        .with_checker(&StructuralReasoner)
        .run(&request)
        .expect("merge run");

    assert_eq!(report.tasks[0].outcome, TaskOutcome::Completed);
    assert_eq!(report.created_class_count(), 4);

    let merged = load(&dir.path().join("out/merged.owl"));
    let infection = merged.class(base("00002").as_str()).expect("infection");
    assert!(infection.parents().contains(&base("00001")));
    assert!(infection.labels().contains(&"Infection".to_string()));
    assert!(infection
        .comments()
        .contains(&"Original IRI: http://import.example/onto#10".to_string()));
    assert_eq!(infection.definitions(), ["Invasion of the body by pathogens."]);

    let viral = merged.class(base("00003").as_str()).expect("viral infection");
    assert_eq!(viral.parents().iter().collect::<Vec<_>>(), vec![&base("00002")]);
    assert!(viral.labels().contains(&"Viral_Infection".to_string()));

    let fever = merged.class(base("00004").as_str()).expect("fever");
    assert!(fever
        .labels()
        .contains(&"Fever_of_Unknown_Origin".to_string()));

    let viral_fever = merged.class(base("00005").as_str()).expect("viral fever");
    assert_eq!(viral_fever.parents().len(), 2);
    assert!(viral_fever.parents().contains(&base("00003")));
    assert!(viral_fever.parents().contains(&base("00004")));

    let causes = merged.property(base("R00001").as_str()).expect("causes");
    assert_eq!(causes.kind(), PropertyKind::Object);
    assert_eq!(causes.domains().iter().collect::<Vec<_>>(), vec![&base("00002")]);
    assert_eq!(causes.ranges().iter().collect::<Vec<_>>(), vec![&base("00001")]);
    assert_eq!(causes.labels(), ["causes"]);

    let onset = merged.property(base("D00001").as_str()).expect("onset days");
    assert_eq!(onset.domains().iter().collect::<Vec<_>>(), vec![&base("00003")]);
    assert!(onset
        .ranges()
        .contains(&iri("http://www.w3.org/2001/XMLSchema#integer")));

    assert!(merged.property(base("R00002").as_str()).is_none());
    assert_eq!(report.properties.excluded.len(), 1);
    assert_eq!(
        report.properties.excluded[0].source,
        iri("http://import.example/onto#carriedBy")
    );
    assert_eq!(
        report.properties.excluded[0].unresolved,
        vec![iri("http://import.example/onto#20")]
    );
}

#[test]
fn checkpoints_and_report_are_written() {
    let dir = fixtures();
    let store = RdfFileStore::new();
    let request = request(
        dir.path(),
        "base.owl",
        vec![
            task(
                "http://import.example/onto#11",
                "http://base.example/onto#00001",
                "step1.owl",
            ),
            task(
                "http://import.example/onto#404",
                "http://base.example/onto#00001",
                "step2.owl",
            ),
            task(
                "http://import.example/onto#12",
                "http://base.example/onto#00001",
                "step3.owl",
            ),
        ],
    );

    let report = MergeOrchestrator::new(&store)
        .run(&request)
        .expect("merge run");

    let out = dir.path().join("out");
    assert_eq!(load(&out.join("step1.owl")).classes().len(), 3);
    assert_eq!(load(&out.join("step2.owl")).classes().len(), 3);
    assert_eq!(load(&out.join("step3.owl")).classes().len(), 4);
    assert_eq!(report.tasks[1].outcome, TaskOutcome::ImportClassNotFound);

    // the shared subclass was migrated by the first task and only gains a parent
    let step3 = &report.tasks[2];
    assert_eq!(step3.created_count(), 1);
    let viral_fever = step3
        .classes
        .iter()
        .find(|class| class.source == iri("http://import.example/onto#13"))
        .expect("viral fever revisited");
    assert!(viral_fever.reused);
    assert_eq!(viral_fever.parents.len(), 2);

    let json: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(out.join("merged.owl.report.json")).expect("report file"),
    )
    .expect("report json");
    assert_eq!(json["tasks"][0]["outcome"]["status"], "completed");
    assert_eq!(json["tasks"][1]["outcome"]["status"], "import_class_not_found");
    assert_eq!(json["tasks"][2]["classes"].as_array().map(Vec::len), Some(2));
}

#[test]
fn identifiers_never_collide_across_runs() {
    let dir = fixtures();
    let store = RdfFileStore::new();
    let tasks = vec![task(
        "http://import.example/onto#10",
        "http://base.example/onto#00001",
        "step1.owl",
    )];

    MergeOrchestrator::new(&store)
        .run(&request(dir.path(), "base.owl", tasks.clone()))
        .expect("first run");
    fs::copy(
        dir.path().join("out/merged.owl"),
        dir.path().join("merged_once.owl"),
    )
    .expect("copy merged");
    let before = load(&dir.path().join("merged_once.owl"));

    let report = MergeOrchestrator::new(&store)
        .run(&request(dir.path(), "merged_once.owl", tasks))
        .expect("second run");

    for class in &report.tasks[0].classes {
        assert!(!before.contains_class(class.destination.as_str()));
        let index: u64 = class
            .destination
            .suffix_after(BASE_IRI)
            .and_then(|suffix| suffix.parse().ok())
            .expect("numeric suffix");
        assert!(index > 5);
    }
    assert_eq!(report.properties.created[0].destination, base("R00002"));
    assert_eq!(report.properties.created[1].destination, base("D00002"));
}

#[test]
fn missing_base_parent_aborts_only_that_task() {
    let dir = fixtures();
    let store = RdfFileStore::new();
    let request = request(
        dir.path(),
        "base.owl",
        vec![
            task(
                "http://import.example/onto#10",
                "http://base.example/onto#99999",
                "step1.owl",
            ),
            task(
                "http://import.example/onto#20",
                "http://base.example/onto#00001",
                "step2.owl",
            ),
        ],
    );

    let report = MergeOrchestrator::new(&store)
        .run(&request)
        .expect("merge run");

    assert_eq!(report.tasks[0].outcome, TaskOutcome::BaseParentNotFound);
    assert!(report.tasks[0].classes.is_empty());
    assert_eq!(report.tasks[1].outcome, TaskOutcome::Completed);
    assert!(dir.path().join("out/step1.owl").exists());
    // nothing of the closure of #10 arrived, so no property qualifies
    assert!(report.properties.created.is_empty());
    assert_eq!(report.properties.excluded.len(), 3);
}

#[test]
fn failed_consistency_check_stops_the_run() {
    let dir = fixtures();
    let cyclic = IMPORT.replace(
        r#"<owl:Class rdf:about="http://import.example/onto#10">"#,
        r#"<owl:Class rdf:about="http://import.example/onto#10">
    <rdfs:subClassOf rdf:resource="http://import.example/onto#13"/>"#,
    );
    fs::write(dir.path().join("import.owl"), cyclic).expect("cyclic import");
    let store = RdfFileStore::new();
    let request = request(
        dir.path(),
        "base.owl",
        vec![task(
            "http://import.example/onto#10",
            "http://base.example/onto#00001",
            "step1.owl",
        )],
    );

    let err = MergeOrchestrator::new(&store)
        .with_checker(&StructuralReasoner)
        .run(&request)
        .expect_err("inconsistent import");

    assert!(matches!(err, Error::Reasoner(_)));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn class_expression_domain_excludes_the_property() {
    let dir = fixtures();
    let with_union = IMPORT.replace(
        "</rdf:RDF>",
        r#"  <owl:ObjectProperty rdf:about="http://import.example/onto#unionProp">
    <rdfs:domain>
      <owl:Class>
        <owl:unionOf rdf:parseType="Collection">
          <rdf:Description rdf:about="http://import.example/onto#10"/>
          <rdf:Description rdf:about="http://import.example/onto#20"/>
        </owl:unionOf>
      </owl:Class>
    </rdfs:domain>
    <rdfs:range rdf:resource="http://base.example/onto#00001"/>
  </owl:ObjectProperty>
</rdf:RDF>"#,
    );
    fs::write(dir.path().join("import.owl"), with_union).expect("union import");
    let store = RdfFileStore::new();
    let request = request(
        dir.path(),
        "base.owl",
        vec![task(
            "http://import.example/onto#10",
            "http://base.example/onto#00001",
            "step1.owl",
        )],
    );

    let report = MergeOrchestrator::new(&store)
        .run(&request)
        .expect("merge run");

    assert!(report
        .properties
        .created
        .iter()
        .all(|property| property.source != iri("http://import.example/onto#unionProp")));
    let union_prop = report
        .properties
        .excluded
        .iter()
        .find(|excluded| excluded.source == iri("http://import.example/onto#unionProp"))
        .expect("unionProp excluded");
    assert_eq!(union_prop.anonymous_domains, 1);
    assert!(union_prop.unresolved.is_empty());

    // causes and onsetDays keep their identifiers
    let merged = load(&dir.path().join("out/merged.owl"));
    assert!(merged.property(base("R00001").as_str()).is_some());
    assert!(merged.property(base("R00002").as_str()).is_none());
    assert!(merged.property(base("D00001").as_str()).is_some());
}

#[test]
fn malformed_task_iris_only_affect_their_own_task() {
    let dir = fixtures();
    let tasks_path = dir.path().join("tasks.json");
    fs::write(
        &tasks_path,
        r#"[
            {"import_class_iri": "http://import.example/onto#11", "base_parent_iri": "http://base.example/onto#00001", "output_file": "step1.owl"},
            {"import_class_iri": "X#10", "base_parent_iri": "http://base.example/onto#00001", "output_file": "step2.owl"},
            {"import_class_iri": "http://import.example/onto#20", "base_parent_iri": "base 00001", "output_file": "step3.owl"},
            {"import_class_iri": "http://import.example/onto#12", "base_parent_iri": "http://base.example/onto#00001", "output_file": "step4.owl"}
        ]"#,
    )
    .expect("task file");
    let tasks = load_tasks(&tasks_path).expect("tasks");
    let store = RdfFileStore::new();

    let report = MergeOrchestrator::new(&store)
        .run(&request(dir.path(), "base.owl", tasks))
        .expect("merge run");

    let outcomes: Vec<&TaskOutcome> = report.tasks.iter().map(|task| &task.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            &TaskOutcome::Completed,
            &TaskOutcome::ImportClassNotFound,
            &TaskOutcome::BaseParentNotFound,
            &TaskOutcome::Completed,
        ]
    );
    assert_eq!(report.tasks[1].import_class, "X#10");
    assert_eq!(report.tasks[2].base_parent, "base 00001");
    assert_eq!(report.created_class_count(), 3);
    assert!(dir.path().join("out/step4.owl").exists());
}
