use nom::IResult;
use nom_language::error::VerboseError;
use nom_locate::LocatedSpan;

/// Input type of the front-end parsers. The located span carries the byte
/// offsets that end up as `SrcRange`s on the semantic tree.
pub type Span<'a> = LocatedSpan<&'a str>;

pub type ParseResult<'a, O> = IResult<Span<'a>, O, VerboseError<Span<'a>>>;
