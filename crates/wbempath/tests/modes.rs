#![expect(missing_docs)]

use rstest::rstest;
use wbempath::{
    CreateMode, ObjectPath, OutputMode, PathError, PathObject, WBEMPATH_GET_ORIGINAL,
    WBEMPATH_GET_SERVER_TOO, decode_wide,
};

const FULL: &str = r"\\server\root\cimv2:Win32_Process";

fn object(text: &str) -> PathObject {
    let mut path = PathObject::new();
    path.get_mut()
        .expect("sole reference")
        .set_text(CreateMode::ACCEPT_ALL, Some(text))
        .expect("set_text");
    path
}

/// Runs both halves of the size-query protocol and decodes the result.
fn get_text(path: &PathObject, flags: i32) -> String {
    let mut capacity = 0;
    path.get_text(flags, &mut capacity, None).unwrap();
    let mut buffer = vec![0u16; capacity as usize];
    path.get_text(flags, &mut capacity, Some(&mut buffer)).unwrap();
    assert_eq!(capacity as usize, buffer.len());
    decode_wide(&buffer).unwrap()
}

#[rstest]
#[case(FULL, OutputMode::Default, Some(r"root\cimv2:Win32_Process"))]
#[case(FULL, OutputMode::ServerToo, Some(FULL))]
#[case(FULL, OutputMode::NamespaceOnly, Some(r"root\cimv2"))]
#[case(FULL, OutputMode::RelativeOnly, Some("Win32_Process"))]
#[case(FULL, OutputMode::ServerAndNamespaceOnly, Some(r"\\server\root\cimv2"))]
#[case(FULL, OutputMode::Original, Some(FULL))]
#[case(r"root\cimv2:Win32_Process", OutputMode::ServerAndNamespaceOnly, Some(r"\\.\root\cimv2"))]
#[case(r"root\cimv2:Win32_Process", OutputMode::ServerToo, Some(r"\\.\root\cimv2:Win32_Process"))]
#[case(r"\\server\root", OutputMode::RelativeOnly, None)]
#[case(r"\\server\root", OutputMode::Default, Some("root"))]
#[case("//server/root/cimv2:Win32_Process", OutputMode::ServerToo, Some(FULL))]
#[case("//server/root/cimv2:Win32_Process", OutputMode::Original, Some("//server/root/cimv2:Win32_Process"))]
#[case(r#"\\server\root:Win32_Process.Handle="4""#, OutputMode::ServerToo, Some(r"\\server\root:Win32_Process"))]
#[case("Win32_Process", OutputMode::Default, Some(":Win32_Process"))]
#[case("Win32_Process", OutputMode::RelativeOnly, Some("Win32_Process"))]
#[case("Win32_Process", OutputMode::NamespaceOnly, Some(""))]
fn renders_projection(
    #[case] text: &str,
    #[case] mode: OutputMode,
    #[case] expected: Option<&str>,
) {
    let path = object(text);
    assert_eq!(path.text(mode).unwrap().as_deref(), expected);
    assert_eq!(get_text(&path, mode.flags()), expected.unwrap_or(""));
}

#[rstest]
#[case(r"\\server\root\cimv2:Win32_Process", 2)]
#[case(r"\\server\root:Win32_Process", 1)]
#[case(r"\\server", 0)]
#[case(r"\\server\a\b\c\d", 4)]
#[case(r"root\cimv2:Win32_Process", 2)]
#[case(r"\root\cimv2", 2)]
#[case("Win32_Process", 0)]
fn counts_namespaces(#[case] text: &str, #[case] expected: u32) {
    assert_eq!(object(text).namespace_count(), Ok(expected));
}

#[rstest]
#[case(r"\\server:Win32_Process", "server:Win32_Process", r"\\server:Win32_Process")]
#[case(
    "//server:Win32_Process.Handle=1",
    "server:Win32_Process.Handle=1",
    r"\\server:Win32_Process.Handle=1"
)]
#[case(r"\\server:Win32_Process\root", "server:Win32_Process", r"\\server:Win32_Process\root")]
fn server_runs_to_first_separator(
    #[case] text: &str,
    #[case] server: &str,
    #[case] server_and_namespace: &str,
) {
    let path = object(text);
    assert_eq!(path.buffer().server(), Some(server));
    assert_eq!(path.buffer().class_name(), None);
    assert!(!path.buffer().has_key_list());
    assert_eq!(path.text(OutputMode::RelativeOnly), Ok(None));
    assert_eq!(
        path.text(OutputMode::ServerAndNamespaceOnly).unwrap().as_deref(),
        Some(server_and_namespace)
    );
}

#[test]
fn size_query_includes_terminator() {
    let path = object(FULL);
    let mut capacity = 0;
    path.get_text(WBEMPATH_GET_SERVER_TOO, &mut capacity, None)
        .unwrap();
    assert_eq!(capacity as usize, FULL.encode_utf16().count() + 1);

    // A larger buffer is accepted and the exact size is written back.
    let mut capacity = 128;
    let mut buffer = [0u16; 128];
    path.get_text(WBEMPATH_GET_ORIGINAL, &mut capacity, Some(&mut buffer))
        .unwrap();
    assert_eq!(capacity as usize, FULL.len() + 1);
    assert_eq!(decode_wide(&buffer).as_deref(), Some(FULL));
}

#[test]
fn original_is_absent_on_a_fresh_object() {
    let path = PathObject::new();
    assert_eq!(path.text(OutputMode::Original), Ok(None));
    assert_eq!(path.namespace_count(), Ok(0));
    assert_eq!(get_text(&path, WBEMPATH_GET_ORIGINAL), "");
}

#[test]
fn shared_object_reads_agree() {
    let path = object(FULL);
    let other = path.query_interface(&wbempath::IID_IWBEMPATH).unwrap();
    for mode in OutputMode::ALL {
        assert_eq!(path.text(mode), other.text(mode));
    }
    assert_eq!(other.release(), 1);
    assert_eq!(path.release(), 0);
}

#[test]
fn invalid_arguments_do_not_clear_state() {
    let mut path = object(FULL);
    let inner = path.get_mut().unwrap();
    assert_eq!(
        inner.set_text(CreateMode::empty(), Some("x")),
        Err(PathError::InvalidParameter)
    );
    assert_eq!(inner.text(OutputMode::Original).unwrap().as_deref(), Some(FULL));
}
