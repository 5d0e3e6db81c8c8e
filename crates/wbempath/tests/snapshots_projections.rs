#![expect(missing_docs)]
#![allow(clippy::needless_raw_string_hashes)]

use core::fmt::Write;

use wbempath::{OutputMode, PathBuffer, build};

fn render_all(text: &str) -> String {
    let buffer: PathBuffer = text.parse().expect("parse");
    let mut out = String::new();
    for mode in OutputMode::ALL {
        let written = match build(&buffer, mode).expect("build") {
            Some(rendered) => writeln!(out, "{mode:?} ({}): {rendered}", rendered.len()),
            None => writeln!(out, "{mode:?}: <absent>"),
        };
        written.unwrap();
    }
    out
}

#[test]
fn snapshot_full_path() {
    insta::assert_snapshot!(render_all(r"\\server\root\cimv2:Win32_Process"), @r#"
    Default (24): root\cimv2:Win32_Process
    RelativeOnly (13): Win32_Process
    ServerToo (33): \\server\root\cimv2:Win32_Process
    ServerAndNamespaceOnly (19): \\server\root\cimv2
    NamespaceOnly (10): root\cimv2
    Original (33): \\server\root\cimv2:Win32_Process
    "#);
}

#[test]
fn snapshot_relative_path() {
    insta::assert_snapshot!(render_all(r"root/cimv2:Win32_Process"), @r#"
    Default (24): root\cimv2:Win32_Process
    RelativeOnly (13): Win32_Process
    ServerToo (28): \\.\root\cimv2:Win32_Process
    ServerAndNamespaceOnly (14): \\.\root\cimv2
    NamespaceOnly (10): root\cimv2
    Original (24): root/cimv2:Win32_Process
    "#);
}

#[test]
fn snapshot_server_without_class() {
    insta::assert_snapshot!(render_all(r"\\server\root"), @r#"
    Default (4): root
    RelativeOnly: <absent>
    ServerToo (13): \\server\root
    ServerAndNamespaceOnly (13): \\server\root
    NamespaceOnly (4): root
    Original (13): \\server\root
    "#);
}

#[test]
fn snapshot_key_list_is_ignored() {
    let text = r#"\\.\root\cimv2:Win32_Service.Name="Spooler""#;
    let buffer: PathBuffer = text.parse().unwrap();
    assert!(buffer.has_key_list());
    insta::assert_snapshot!(render_all(text), @r#"
    Default (24): root\cimv2:Win32_Service
    RelativeOnly (13): Win32_Service
    ServerToo (28): \\.\root\cimv2:Win32_Service
    ServerAndNamespaceOnly (14): \\.\root\cimv2
    NamespaceOnly (10): root\cimv2
    Original (43): \\.\root\cimv2:Win32_Service.Name="Spooler"
    "#);
}

#[test]
fn snapshot_parsed_components() {
    let buffer: PathBuffer = r"//host/root//cimv2:".parse().unwrap();
    insta::assert_debug_snapshot!(
        (buffer.server(), buffer.namespaces(), buffer.class_name()),
        @r#"
    (
        Some(
            "host",
        ),
        [
            "root",
            "",
            "cimv2",
        ],
        Some(
            "",
        ),
    )
    "#
    );
}
