//! Type-string builders shared by the engine benchmarks.

/// `slice<slice<...<leaf>...>>` nested `depth` times.
pub fn nested_slices(depth: usize, leaf: &str) -> String {
    format!("{}{leaf}{}", "slice<".repeat(depth), ">".repeat(depth))
}

/// A struct payload with `width` fields, each holding a small generic.
pub fn wide_struct(width: usize, leaf: &str) -> String {
    let fields: Vec<String> = (0..width)
        .map(|i| format!("f{i:04}:map<string,Owned<{leaf}>>"))
        .collect();
    format!("Struct{{{}}}", fields.join(","))
}

/// An expected/actual pair whose only difference is an `Owned` arity buried
/// `depth` levels down, alternating container and struct layers.
pub fn buried_mismatch(depth: usize) -> (String, String) {
    let mut want = "Owned<T>".to_string();
    let mut got = "Owned<int,string>".to_string();
    for level in 0..depth {
        if level % 2 == 0 {
            want = format!("map<string,{want}>");
            got = format!("map<string,{got}>");
        } else {
            want = format!("Struct{{id:int,inner:{want}}}");
            got = format!("Struct{{id:int,inner:{got}}}");
        }
    }
    (want, got)
}
