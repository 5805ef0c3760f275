//! Property tests over documents assembled from known-good pieces.

use std::path::Path;

use gts_ir::Span;
use gts_transform::extract;
use proptest::prelude::*;

use crate::common::{nodes_of, parse_ok, slice, unresolved};

const PIECES: &[&str] = &[
    "const a = 1;\n",
    "let s = '<template>';\n",
    "// <template> in a comment\n",
    "const t = `x ${1} <template>`;\n",
    "export const A = <template><div class=\"x\">{{a}}</div></template>;\n",
    "export const B = <template>\n  multi\n  line {{@arg}}\n</template>;\n",
    "class C {\n  <template>in a class</template>\n}\n",
    "const f = () => <template>{{#if a}}é{{else}}ü{{/if}}</template>;\n",
    "const u = 'ünïcödé';\n",
    "const g = 'hi'\n",
    "import Foo from './foo'\n",
    "<template><Foo />{{a}}</template>\n",
    "class D {\n  count = 0\n  <template>{{this.count}}</template>\n}\n",
    "class E {\n  @tracked count\n  <template>{{this.count}}</template>\n}\n",
];

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(PIECES), 0..8).prop_map(|pieces| pieces.concat())
}

proptest! {
    #[test]
    fn transformed_text_has_the_original_length(src in document()) {
        let out = extract(&src, Some(Path::new("doc.gts"))).unwrap();
        prop_assert_eq!(out.text.len(), src.len());
        for region in &out.regions {
            prop_assert_eq!(region.placeholder_text.len(), region.raw_text.len());
            prop_assert_eq!(region.span.slice(&src), Some(region.raw_text.as_str()));
        }
    }

    #[test]
    fn parsed_documents_are_faithful(src in document()) {
        let result = parse_ok(&src, "doc.gts");
        prop_assert_eq!(result.ast.get(result.root).range, Span::new(0, src.len() as u32));

        let templates = nodes_of(&result, "GlimmerTemplate");
        let regions = extract(&src, Some(Path::new("doc.gts"))).unwrap().regions;
        prop_assert_eq!(templates.len(), regions.len());
        for (template, region) in templates.iter().zip(&regions) {
            prop_assert_eq!(slice(&src, &result, *template), region.raw_text.as_str());
        }

        for pair in result.tokens.windows(2) {
            prop_assert!(pair[0].range.start <= pair[1].range.start);
        }
        // only `a`, `Foo` and the decorator can miss their declarations
        prop_assert!(unresolved(&result).iter().all(|name| matches!(name.as_str(), "a" | "Foo" | "tracked")));
    }
}
