use hack_asm::coder::{translate_comp, translate_dest, translate_jmp, COMP_TABLE};
use hack_asm::{AsmError, Field};

#[test]
fn valid_dest() {
    let cases = [("", "000"), ("MAD", "111"), ("DA", "110"), ("M", "001"), ("dm", "011")];
    for (mnemonic, expected) in cases {
        assert_eq!(translate_dest(mnemonic).unwrap().to_string(), expected, "{mnemonic}");
    }
}

#[test]
fn dest_ignores_register_order() {
    let amd = translate_dest("AMD").unwrap();
    for spelling in ["ADM", "MAD", "MDA", "DAM", "DMA"] {
        assert_eq!(translate_dest(spelling).unwrap(), amd);
    }
    assert_eq!(translate_dest("MD").unwrap(), translate_dest("DM").unwrap());
}

#[test]
fn invalid_dest() {
    for mnemonic in ["l", "shoot", "MDM", "AA"] {
        let err = translate_dest(mnemonic).unwrap_err();
        assert_eq!(
            err,
            AsmError::InvalidMnemonic { field: Field::Dest, mnemonic: mnemonic.to_string() }
        );
        let msg = err.to_string();
        assert!(msg.contains(mnemonic) && msg.contains("dest"), "{msg}");
    }
}

#[test]
fn valid_jmp() {
    let cases = [("", "000"), ("jgt", "001"), ("JLe", "110"), ("jMp", "111"), ("JNE", "101")];
    for (mnemonic, expected) in cases {
        assert_eq!(translate_jmp(mnemonic).unwrap().to_string(), expected, "{mnemonic}");
    }
}

#[test]
fn invalid_jmp() {
    for mnemonic in ["JA", "jbe", "AD", "bla"] {
        let msg = translate_jmp(mnemonic).unwrap_err().to_string();
        assert!(msg.contains(mnemonic) && msg.contains("jmp"), "{msg}");
    }
}

#[test]
fn valid_comp() {
    let cases = [("0", "0101010"), ("D+1", "0011111"), ("D|M", "1010101"), ("m-d", "1000111")];
    for (mnemonic, expected) in cases {
        assert_eq!(translate_comp(mnemonic).unwrap().to_string(), expected, "{mnemonic}");
    }
}

#[test]
fn invalid_comp() {
    for mnemonic in ["!1", "1-M", "A+M", "A&M", "! D", "D -1", "A + D"] {
        let msg = translate_comp(mnemonic).unwrap_err().to_string();
        assert!(msg.contains(mnemonic) && msg.contains("comp"), "{msg}");
    }
}

#[test]
fn commutative_comps_share_codes() {
    for (a, b) in [
        ("D+A", "A+D"),
        ("D&A", "A&D"),
        ("D|A", "A|D"),
        ("D+M", "M+D"),
        ("D&M", "M&D"),
        ("D|M", "M|D"),
    ] {
        assert_eq!(translate_comp(a).unwrap(), translate_comp(b).unwrap(), "{a} vs {b}");
    }
}

#[test]
fn every_comp_entry_translates_case_insensitively() {
    for desc in COMP_TABLE {
        let lower = desc.mnemonic.to_ascii_lowercase();
        assert_eq!(translate_comp(&lower).unwrap().bits, desc.bits);
    }
}
