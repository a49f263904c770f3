use std::path::Path;

use ts_interface_gen::{
    Error, ExportOptions, SessionScope, SourceProject, export_interfaces, load_instructions,
};

const DASHBOARD: &str = r#"import { DashboardLayoutType } from "./DashboardLayoutType";
import { Widget } from "./Widget";
import { AttributeTypeMap } from "../util";
/**
 * A dashboard is a tool for visually tracking key performance metrics.
 */
export declare class Dashboard {
    /**
     * Identifier of the dashboard author.
     */
    "authorHandle"?: string;
    "layoutType": DashboardLayoutType;
    "widgets": Array<Widget>;
    "tags"?: Array<string> | null;
    "createdAt"?: Date;
    "additionalProperties"?: {
        [key: string]: any;
    };
    /**
     * @ignore
     */
    "_unparsed"?: boolean;
    /**
     * @ignore
     */
    static readonly attributeTypeMap: AttributeTypeMap;
    /**
     * @ignore
     */
    static getAttributeTypeMap(): AttributeTypeMap;
    constructor();
}
"#;

const DASHBOARD_LAYOUT_TYPE: &str = r#"import { UnparsedObject } from "../util";
export declare type DashboardLayoutType = typeof ORDERED | typeof FREE | UnparsedObject;
export declare const ORDERED = "ordered";
export declare const FREE = "free";
"#;

const WIDGET: &str = r#"import { WidgetDefinition } from "./WidgetDefinition";
export declare class Widget {
    "definition": WidgetDefinition;
    "id"?: number;
    "layout"?: [number, number];
    constructor();
}
"#;

const WIDGET_DEFINITION: &str = r#"import { NoteWidgetDefinition } from "./NoteWidgetDefinition";
import { UnparsedObject } from "../util";
export declare type WidgetDefinition = NoteWidgetDefinition | UnparsedObject;
"#;

const NOTE_WIDGET_DEFINITION: &str = r#"export declare class NoteWidgetDefinition {
    "content": string;
    "type": NoteWidgetDefinitionType;
}
export declare type NoteWidgetDefinitionType = typeof NOTE;
export declare const NOTE = "note";
"#;

const UTIL: &str = r#"export declare class UnparsedObject {
    _data: any;
    constructor(data: any);
    getData(): any;
}
export declare type AttributeTypeMap = {
    [key: string]: {
        baseName: string;
        type: string;
    };
};
"#;

const EXPECTED: &str = r#"export interface Dashboard {
    /**
     * Identifier of the dashboard author.
     */
    readonly "authorHandle"?: string;
    readonly "layoutType": "ordered" | "free" | UnparsedObject;
    readonly "widgets": Widget[];
    readonly "tags"?: string[] | null;
    readonly "createdAt"?: Date;
    readonly "additionalProperties"?: { [key: string]: any; };
}

export interface UnparsedObject {
    /**
     * @internal
     */
    readonly _data: any;
}

export interface Widget {
    readonly "definition": NoteWidgetDefinition | UnparsedObject;
    readonly "id"?: number;
    readonly "layout"?: Array<number | number>;
}

export interface NoteWidgetDefinition {
    readonly "content": string;
    readonly "type": "note";
}
"#;

fn write_fixtures(root: &Path) {
    let models = root.join("models");
    std::fs::create_dir_all(&models).unwrap();
    std::fs::write(models.join("Dashboard.d.ts"), DASHBOARD).unwrap();
    std::fs::write(models.join("DashboardLayoutType.d.ts"), DASHBOARD_LAYOUT_TYPE).unwrap();
    std::fs::write(models.join("Widget.d.ts"), WIDGET).unwrap();
    std::fs::write(models.join("WidgetDefinition.d.ts"), WIDGET_DEFINITION).unwrap();
    std::fs::write(models.join("NoteWidgetDefinition.d.ts"), NOTE_WIDGET_DEFINITION).unwrap();
    std::fs::write(root.join("util.d.ts"), UTIL).unwrap();
}

fn write_instructions(root: &Path, seeds: &[(&str, &str, &str)]) -> std::path::PathBuf {
    let mut by_target: Vec<(String, Vec<serde_json::Value>)> = Vec::new();
    for (target, file, class) in seeds {
        let seed = serde_json::json!({
            "file": root.join(file),
            "type": class,
        });
        match by_target.iter_mut().find(|(t, _)| t == target) {
            Some((_, list)) => list.push(seed),
            None => by_target.push((target.to_string(), vec![seed])),
        }
    }
    let instructions: Vec<serde_json::Value> = by_target
        .into_iter()
        .map(|(target, seeds)| {
            serde_json::json!({
                "targetFile": root.join("out").join(target),
                "sourceTypes": seeds,
            })
        })
        .collect();
    let path = root.join("build.json");
    std::fs::write(&path, serde_json::to_string_pretty(&instructions).unwrap()).unwrap();
    path
}

fn load_project(root: &Path) -> SourceProject {
    let mut project = SourceProject::new();
    let pattern = format!("{}/models/*.d.ts", root.display());
    project.add_source_files_at_paths(&pattern).unwrap();
    project
}

#[test]
fn exports_dashboard_graph() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let instructions = write_instructions(
        dir.path(),
        &[("datadog.d.ts", "models/Dashboard.d.ts", "Dashboard")],
    );

    let project = load_project(dir.path());
    assert_eq!(project.file_count(), 6);

    let instructions = load_instructions(&instructions).unwrap();
    let reports = export_interfaces(&project, &instructions, ExportOptions::default()).unwrap();
    assert_eq!(
        reports[0].interfaces,
        vec!["Dashboard", "UnparsedObject", "Widget", "NoteWidgetDefinition"]
    );

    let written = std::fs::read_to_string(dir.path().join("out/datadog.d.ts")).unwrap();
    assert_eq!(written, EXPECTED);
}

#[test]
fn repeated_runs_produce_identical_output() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let instructions = write_instructions(
        dir.path(),
        &[("datadog.d.ts", "models/Dashboard.d.ts", "Dashboard")],
    );
    let instructions = load_instructions(&instructions).unwrap();
    let target = dir.path().join("out/datadog.d.ts");

    let project = load_project(dir.path());
    export_interfaces(&project, &instructions, ExportOptions::default()).unwrap();
    let first = std::fs::read_to_string(&target).unwrap();
    export_interfaces(&project, &instructions, ExportOptions::default()).unwrap();
    let second = std::fs::read_to_string(&target).unwrap();
    assert_eq!(first, second);
}

#[test]
fn session_scope_decides_cross_file_sharing() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let instructions = write_instructions(
        dir.path(),
        &[
            ("dashboard.d.ts", "models/Dashboard.d.ts", "Dashboard"),
            ("widget.d.ts", "models/Widget.d.ts", "Widget"),
        ],
    );
    let instructions = load_instructions(&instructions).unwrap();
    let project = load_project(dir.path());

    let shared = export_interfaces(
        &project,
        &instructions,
        ExportOptions {
            scope: SessionScope::Run,
            dry_run: true,
        },
    )
    .unwrap();
    assert!(shared[1].interfaces.is_empty());
    assert_eq!(shared[1].rendered, "");

    let isolated = export_interfaces(
        &project,
        &instructions,
        ExportOptions {
            scope: SessionScope::Instruction,
            dry_run: true,
        },
    )
    .unwrap();
    assert_eq!(
        isolated[1].interfaces,
        vec!["Widget", "NoteWidgetDefinition", "UnparsedObject"]
    );
    assert!(!dir.path().join("out").exists());
}

#[test]
fn unknown_seed_class_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let instructions = write_instructions(
        dir.path(),
        &[("datadog.d.ts", "models/Dashboard.d.ts", "Dashbord")],
    );
    let instructions = load_instructions(&instructions).unwrap();
    let project = load_project(dir.path());

    let err = export_interfaces(&project, &instructions, ExportOptions::default()).unwrap_err();
    match err {
        Error::ClassNotFound { class, .. } => assert_eq!(class, "Dashbord"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn glob_matching_nothing_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut project = SourceProject::new();
    let pattern = format!("{}/models/*.d.ts", dir.path().display());
    assert!(matches!(
        project.add_source_files_at_paths(&pattern),
        Err(Error::NoSourceFiles { .. })
    ));
}
