//! Token-level scan of template markup.
//!
//! The tree builder always synthesizes `<html>`, so whether the template
//! wrote one has to be answered from the token stream.

use std::cell::Cell;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

/// Whether the markup contains a real `<html>` start tag.
///
/// Tags inside comments, attribute values and raw-text elements such as
/// `<script>` do not count.
pub fn has_root_element(source: &str) -> bool {
    let input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(source));

    let tokenizer = Tokenizer::new(RootScan::default(), TokenizerOpts::default());
    let _ = tokenizer.feed(&input);
    tokenizer.end();

    tokenizer.sink.found.get()
}

#[derive(Default)]
struct RootScan {
    found: Cell<bool>,
}

impl TokenSink for RootScan {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(Tag {
                kind: TagKind::StartTag,
                name,
                ..
            }) => {
                // The tokenizer needs the tree builder's state switches,
                // otherwise text inside these elements is read as markup.
                match &*name {
                    "html" => {
                        self.found.set(true);
                        TokenSinkResult::Continue
                    }
                    "script" => TokenSinkResult::RawData(RawKind::ScriptData),
                    "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => {
                        TokenSinkResult::RawData(RawKind::Rawtext)
                    }
                    "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
                    "plaintext" => TokenSinkResult::Plaintext,
                    _ => TokenSinkResult::Continue,
                }
            }
            _ => TokenSinkResult::Continue,
        }
    }
}
