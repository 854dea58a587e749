//! Dependency head assignment.
//!
//! A deterministic approximation of a projective parse, good enough to
//! answer "which word does this preposition modify" for short questions.

use super::{Dep, Pos};

/// Head index and relation for every token. The root points at itself.
pub fn attach(pos: &[Pos]) -> Vec<(usize, Dep)> {
    if pos.is_empty() {
        return Vec::new();
    }
    let root = find_root(pos);

    (0..pos.len())
        .map(|i| {
            if i == root {
                return (i, Dep::Root);
            }
            match pos[i] {
                Pos::Punct => (root, Dep::Punct),
                p if p.is_nominal() && !is_phrase_head(pos, i) => (run_end(pos, i), Dep::Compound),
                Pos::Det | Pos::Adj | Pos::Num => attach_modifier(pos, i, root),
                Pos::Adp => (
                    nearest_left(pos, i, |p| {
                        p.is_nominal() || matches!(p, Pos::Pron | Pos::Verb | Pos::Adj | Pos::X)
                    })
                    .unwrap_or(root),
                    Dep::Prep,
                ),
                Pos::Noun | Pos::Propn | Pos::Pron | Pos::X => attach_phrase(pos, i, root),
                Pos::Aux => (root, Dep::Aux),
                Pos::Adv => (root, Dep::Advmod),
                Pos::Cconj => (
                    nearest_left(pos, i, |p| p != Pos::Punct).unwrap_or(root),
                    Dep::Cc,
                ),
                Pos::Verb if i > 0 && pos[i - 1].is_nominal() => (i - 1, Dep::Acl),
                _ => (root, Dep::Dep),
            }
        })
        .collect()
}

fn find_root(pos: &[Pos]) -> usize {
    pos.iter()
        .position(|p| *p == Pos::Verb)
        .or_else(|| (0..pos.len()).find(|&i| pos[i].is_nominal() && is_phrase_head(pos, i)))
        .or_else(|| pos.iter().position(|p| *p != Pos::Punct))
        .unwrap_or(0)
}

/// A nominal is a phrase head unless another nominal follows it.
fn is_phrase_head(pos: &[Pos], i: usize) -> bool {
    pos.get(i + 1).is_none_or(|p| !p.is_nominal())
}

fn run_end(pos: &[Pos], i: usize) -> usize {
    let mut j = i;
    while j + 1 < pos.len() && pos[j + 1].is_nominal() {
        j += 1;
    }
    j
}

fn nearest_left(pos: &[Pos], i: usize, pred: impl Fn(Pos) -> bool) -> Option<usize> {
    (0..i).rev().find(|&j| pred(pos[j]))
}

fn is_premodifier(p: Pos) -> bool {
    matches!(p, Pos::Det | Pos::Adj | Pos::Num | Pos::Adv) || p.is_nominal()
}

/// Determiners, adjectives and numbers modify the next phrase head.
fn attach_modifier(pos: &[Pos], i: usize, root: usize) -> (usize, Dep) {
    let target = (i + 1..pos.len())
        .take_while(|&j| is_premodifier(pos[j]))
        .find(|&j| pos[j].is_nominal() && is_phrase_head(pos, j));

    match (target, pos[i]) {
        (Some(head), Pos::Det) => (head, Dep::Det),
        (Some(head), Pos::Adj) => (head, Dep::Amod),
        (Some(head), _) => (head, Dep::Nummod),
        (None, Pos::Num) => attach_phrase(pos, i, root),
        (None, Pos::Adj) => match nearest_left(pos, i, |p| p.is_nominal()) {
            Some(head) => (head, Dep::Amod),
            None => (root, Dep::Dep),
        },
        (None, _) => (root, Dep::Dep),
    }
}

/// Attach the head of a noun phrase to whatever precedes the phrase.
fn attach_phrase(pos: &[Pos], i: usize, root: usize) -> (usize, Dep) {
    let mut start = i;
    while start > 0 && is_premodifier(pos[start - 1]) && pos[start - 1] != Pos::Adv {
        start -= 1;
    }

    let Some(left) = start.checked_sub(1) else {
        return if root > i {
            (root, Dep::Nsubj)
        } else {
            (root, Dep::Dep)
        };
    };

    match pos[left] {
        Pos::Adp => (left, Dep::Pobj),
        Pos::Verb | Pos::Aux => (left, Dep::Dobj),
        Pos::Cconj => {
            let prev = nearest_left(pos, left, |p| p.is_nominal() || p == Pos::Pron);
            (prev.unwrap_or(root), Dep::Conj)
        }
        _ if root > i => (root, Dep::Nsubj),
        _ => (root, Dep::Dep),
    }
}
