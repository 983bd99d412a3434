//! End-to-end tests for declaring output parameters and resolving their
//! file patterns against a process context and working directory.

use std::path::PathBuf;

use outspec::{
    BindValue, ContextValue, DeclaredParam, FilePatternParam, ParamError, ParamKind, ParamList,
    ResolveContext, ValueOutputParam,
};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn literal_inside_work_dir_resolves_to_relative_pattern() {
    init_logging();
    let work_dir = PathBuf::from("/work/ab12");
    let mut param = FilePatternParam::new(0);
    param.bind("/work/ab12/output.txt").separator(':');

    let patterns = param.file_patterns(&ResolveContext::new(), &work_dir).unwrap();
    assert_eq!(patterns, vec!["output.txt"]);
}

#[test]
fn separator_splits_literal_into_ordered_patterns() {
    let work_dir = PathBuf::from("/irrelevant");
    let mut param = FilePatternParam::new(0);
    param.bind("a.txt:b.txt").separator(':');

    let patterns = param.file_patterns(&ResolveContext::new(), &work_dir).unwrap();
    assert_eq!(patterns, vec!["a.txt", "b.txt"]);
}

#[test]
fn variable_reference_resolves_through_context() {
    let work_dir = PathBuf::from("/work/ab12");
    let mut param = FilePatternParam::new(0);
    param.bind(BindValue::var("sample_id"));

    let context = ResolveContext::new().with("sample_id", "S1.bam");
    assert_eq!(
        param.file_patterns(&context, &work_dir).unwrap(),
        vec!["S1.bam"]
    );

    // Absent variable falls back to its literal name, never an error
    assert_eq!(
        param.file_patterns(&ResolveContext::new(), &work_dir).unwrap(),
        vec!["sample_id"]
    );
}

#[test]
fn resolution_against_a_real_working_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let work_dir = tmp.path().to_path_buf();

    let mut param = FilePatternParam::new(0);
    let produced = work_dir.join("chunks").join("part_01.fa");
    param.bind(BindValue::func(move |_| {
        Ok(ContextValue::Path(produced.clone()))
    }));

    let patterns = param.file_patterns(&ResolveContext::new(), &work_dir).unwrap();
    assert_eq!(patterns, vec!["chunks/part_01.fa"]);

    // The same resolved path against a sibling directory is out of scope
    let sibling = work_dir.parent().unwrap().join("not-the-sandbox");
    let mut escaping = FilePatternParam::new(1);
    let outside = work_dir.join("data.txt");
    escaping.bind(BindValue::func(move |_| {
        Ok(ContextValue::Path(outside.clone()))
    }));
    let err = escaping
        .file_patterns(&ResolveContext::new(), &sibling)
        .unwrap_err();
    assert!(matches!(err, ParamError::OutOfScope { .. }));
}

#[test]
fn declaration_to_resolution_through_the_collection() {
    init_logging();
    let work_dir = PathBuf::from("/work/ab12");

    let mut list = ParamList::new();

    let mut report = FilePatternParam::new(0);
    report.bind("report_${run}.html");
    list.push(report);

    let mut coverage = ValueOutputParam::new(1);
    coverage.bind(BindValue::var("coverage"));
    list.push(coverage);

    let mut logs = FilePatternParam::new(2);
    logs.bind("logs/*.log").hidden(true);
    list.push(logs);

    // The engine validates the declarations, then resolves only the
    // file-pattern parameters.
    for param in list.iter() {
        param.lazy_init().unwrap();
    }

    let context = ResolveContext::new().with("run", "42").with("coverage", "0.93");
    let mut resolved = Vec::new();
    for param in list.of_type::<FilePatternParam>() {
        resolved.extend(param.file_patterns(&context, &work_dir).unwrap());
    }
    assert_eq!(resolved, vec!["report_42.html", "logs/*.log"]);

    assert_eq!(
        list.names().unwrap(),
        vec![None, Some("coverage".to_string()), None]
    );
    assert_eq!(list.of_kind(&[ParamKind::FileOutput]).len(), 2);
}

#[test]
fn anonymous_dynamic_outputs_are_lenient_named_ones_strict() {
    let work_dir = PathBuf::from("/work/ab12");
    let context = ResolveContext::new();

    let mut anonymous = FilePatternParam::new(0);
    anonymous.bind("out_${missing}.txt");
    assert!(anonymous.file_patterns(&context, &work_dir).unwrap().is_empty());

    let mut named = FilePatternParam::new(1);
    named.bind(BindValue::var("outname"));
    named.bind("out_${missing}.txt");
    let err = named.file_patterns(&context, &work_dir).unwrap_err();
    assert!(matches!(err, ParamError::MissingVariable { .. }));
}

#[test]
fn singleton_policy_fans_out_and_restores() {
    let mut list = ParamList::new();

    let mut file = FilePatternParam::new(0);
    file.bind("out.txt");
    list.push(file);

    let mut value = ValueOutputParam::new(1);
    value.bind(BindValue::var("total"));
    list.push(value);

    list.set_singleton(true);
    assert!(list.of_type::<FilePatternParam>()[0].is_singleton());
    assert!(list.of_type::<ValueOutputParam>()[0].is_singleton());

    list.set_singleton(false);
    assert!(!list.of_type::<FilePatternParam>()[0].is_singleton());
    assert!(!list.of_type::<ValueOutputParam>()[0].is_singleton());
}

#[test]
fn multi_value_entries_resolve_element_wise() {
    let work_dir = PathBuf::from("/work/ab12");
    let mut param = FilePatternParam::new(0);
    param.bind(BindValue::func(|ctx| {
        Ok(ctx
            .get("produced")
            .cloned()
            .unwrap_or(ContextValue::Null))
    }));

    let context = ResolveContext::new().with(
        "produced",
        ContextValue::List(vec![
            ContextValue::from("/work/ab12/a.vcf"),
            ContextValue::from("b.vcf"),
        ]),
    );
    assert_eq!(
        param.file_patterns(&context, &work_dir).unwrap(),
        vec!["a.vcf", "b.vcf"]
    );
}
