use std::sync::Arc;

use decomp_core::collab::{MockConstantProvider, MockImportResolver};
use decomp_core::options::Options;
use decomp_core::to_pseudo_code;

fn opts() -> Options {
    Options {
        emit_header_comment: false,
        ..Options::default()
    }
}

#[test]
fn trivial_leaf_function_returns_ret() {
    // ret
    let bytes = [0xC3];
    let text = to_pseudo_code(&bytes, &opts()).unwrap();
    assert!(text.contains("return ret;"));
}

#[test]
fn custom_function_name_appears_in_the_signature() {
    let bytes = [0xC3];
    let options = Options {
        function_name: "MyFunc".to_string(),
        ..opts()
    };
    let text = to_pseudo_code(&bytes, &options).unwrap();
    assert!(text.starts_with("uint64_t MyFunc("));
}

#[test]
fn named_return_constant_resolves_through_the_constant_collaborator() {
    // mov eax, 0x1234 ; ret
    let bytes = [0xB8, 0x34, 0x12, 0x00, 0x00, 0xC3];
    let mut provider = MockConstantProvider::new();
    provider.add(
        "Windows.Win32.Foundation.NTSTATUS",
        0x1234,
        "STATUS_ACCESS_VIOLATION",
    );
    let options = Options {
        constant_provider: Arc::new(provider),
        ..opts()
    };
    let text = to_pseudo_code(&bytes, &options).unwrap();
    assert!(text.contains("STATUS_ACCESS_VIOLATION"));
}

#[test]
fn conditional_branch_becomes_a_labeled_if_goto() {
    // cmp eax, 0 ; jz +2 ; xor eax, eax ; ret
    let bytes = [0x83, 0xF8, 0x00, 0x74, 0x02, 0x31, 0xC0, 0xC3];
    let text = to_pseudo_code(&bytes, &opts()).unwrap();
    assert!(text.contains("if ("));
    assert!(text.contains("goto L1;"));
    assert!(text.contains("L1:"));
}

#[test]
fn two_xmm_zero_stores_coalesce_into_a_32_byte_memset_call() {
    // xorps xmm0, xmm0
    // movups [rdi], xmm0
    // movups [rdi+0x10], xmm0
    // ret
    let bytes = [
        0x0F, 0x57, 0xC0, 0x0F, 0x11, 0x07, 0x0F, 0x11, 0x47, 0x10, 0xC3,
    ];
    let text = to_pseudo_code(&bytes, &opts()).unwrap();
    assert!(text.contains("memset("));
    assert!(text.contains("0x20"));
}

#[test]
fn peb_access_is_tagged_and_rendered_as_an_intrinsic() {
    // mov rax, gs:[0x60] ; ret
    let bytes = [0x65, 0x48, 0x8B, 0x04, 0x25, 0x60, 0x00, 0x00, 0x00, 0xC3];
    let options = Options {
        emit_header_comment: true,
        ..Options::default()
    };
    let text = to_pseudo_code(&bytes, &options).unwrap();
    assert!(text.contains("uses_peb: true"));
    assert!(text.contains("peb()"));
}

#[test]
fn direct_call_through_a_resolved_import_name() {
    // call rel32 ; ret
    let bytes = [0xE8, 0xFB, 0x0F, 0x00, 0x00, 0xC3];
    let mut resolver = MockImportResolver::new();
    resolver.add(0x1400_0001_0 + 5 + 0x0FFB, "kernelbase!CreateFileW");
    let options = Options {
        base_address: 0x1400_0001_0,
        resolve_import_name: Arc::new(resolver),
        ..opts()
    };
    let text = to_pseudo_code(&bytes, &options).unwrap();
    assert!(text.contains("kernelbase!CreateFileW"));
}

#[test]
fn frame_pointer_prologue_and_epilogue_are_suppressed_but_locals_survive() {
    // push rbp; mov rbp, rsp; sub rsp, 0x20; mov dword [rbp-4], ecx; mov rsp, rbp; pop rbp; ret
    let bytes = [
        0x55, 0x48, 0x89, 0xE5, 0x48, 0x83, 0xEC, 0x20, 0x89, 0x4D, 0xFC, 0x48, 0x89, 0xEC, 0x5D, 0xC3,
    ];
    let text = to_pseudo_code(&bytes, &opts()).unwrap();
    assert!(!text.contains("rbp = rsp;"));
    assert!(text.contains("local_4"));
}
