/// Line-oriented parser for the vertex/face subset of Wavefront OBJ
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra::{Point2, Point3, Vector3};
use nom::{
    branch::alt,
    bytes::complete::take_till,
    character::complete::{char, space0, space1, u32 as index},
    combinator::{eof, map, opt, peek, rest, verify},
    error::ErrorKind,
    number::complete::float,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::geometry::{EntityCounts, Face, GeometryStore};

/// Kind of record, decided from the first two characters of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordTag {
    Vertex,
    TexCoord,
    Normal,
    Face,
    Other,
}

impl fmt::Display for RecordTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordTag::Vertex => "vertex",
            RecordTag::TexCoord => "texture coordinate",
            RecordTag::Normal => "normal",
            RecordTag::Face => "face",
            RecordTag::Other => "unrecognized",
        };
        f.write_str(name)
    }
}

/// Classify a line by its leading tag without looking at the fields
pub fn classify(line: &str) -> RecordTag {
    match line.as_bytes() {
        [b'v', b' ', ..] => RecordTag::Vertex,
        [b'v', b't', ..] => RecordTag::TexCoord,
        [b'v', b'n', ..] => RecordTag::Normal,
        [b'f', ..] => RecordTag::Face,
        _ => RecordTag::Other,
    }
}

/// A single parsed line
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Vertex(Point3<f32>),
    TexCoord(Point2<f32>),
    Normal(Vector3<f32>),
    Face(Face),
    Ignored,
    Malformed { tag: RecordTag, reason: String },
}

/// Parse one line (without its terminator) into a record.
///
/// Lines with an unknown tag become [`Record::Ignored`]; lines with a known
/// tag whose fields do not scan become [`Record::Malformed`].
pub fn parse_record(line: &str) -> Record {
    let tag = classify(line);
    // Tags are ASCII, so slicing past them stays on a char boundary.
    let parsed = match tag {
        RecordTag::Vertex => {
            vector3(&line[1..]).map(|(x, y, z)| Record::Vertex(Point3::new(x, y, z)))
        }
        RecordTag::TexCoord => {
            vector2(&line[2..]).map(|(s, t)| Record::TexCoord(Point2::new(s, t)))
        }
        RecordTag::Normal => {
            vector3(&line[2..]).map(|(x, y, z)| Record::Normal(Vector3::new(x, y, z)))
        }
        RecordTag::Face => face(&line[1..]).map(|(a, b, c)| Record::Face(Face::new(a, b, c))),
        RecordTag::Other => return Record::Ignored,
    };

    parsed.unwrap_or_else(|reason| Record::Malformed { tag, reason })
}

fn vector3(input: &str) -> std::result::Result<(f32, f32, f32), String> {
    run(terminated(tuple((field, field, field)), fields_end), input)
}

fn vector2(input: &str) -> std::result::Result<(f32, f32), String> {
    run(terminated(tuple((field, field)), fields_end), input)
}

fn face(input: &str) -> std::result::Result<(u32, u32, u32), String> {
    run(
        terminated(
            tuple((
                preceded(space1, face_group),
                preceded(space1, face_group),
                preceded(space1, face_group),
            )),
            face_end,
        ),
        input,
    )
}

fn run<'a, O>(
    mut parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
    input: &'a str,
) -> std::result::Result<O, String> {
    parser(input).map(|(_, value)| value).map_err(describe)
}

fn field(input: &str) -> IResult<&str, f32> {
    preceded(space1, float)(input)
}

/// Extra components (such as `w`) may follow after whitespace
fn fields_end(input: &str) -> IResult<&str, ()> {
    map(peek(alt((eof, space1))), |_| ())(input)
}

/// `index[/anything]`, keeping only the vertex index
fn face_group(input: &str) -> IResult<&str, u32> {
    terminated(
        verify(index, |&i: &u32| i > 0),
        opt(preceded(char('/'), take_till(|c: char| c.is_whitespace()))),
    )(input)
}

fn face_end(input: &str) -> IResult<&str, &str> {
    preceded(space0, alt((eof, preceded(char('#'), rest))))(input)
}

fn describe(err: nom::Err<nom::error::Error<&str>>) -> String {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => match e.code {
            ErrorKind::Verify => "vertex indices start at 1".to_string(),
            ErrorKind::Eof if !e.input.trim().is_empty() => {
                format!("unexpected trailing input {:?}", e.input.trim())
            }
            _ if e.input.trim().is_empty() => "missing fields".to_string(),
            _ => format!("cannot scan field at {:?}", e.input.trim()),
        },
        nom::Err::Incomplete(_) => "incomplete record".to_string(),
    }
}

/// A record that carried a known tag but could not be scanned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    pub line_number: usize,
    pub tag: RecordTag,
    pub reason: String,
}

/// Statistics accumulated over one parse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub lines: usize,
    pub ignored: usize,
    pub malformed: Vec<MalformedRecord>,
    pub counts: EntityCounts,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty()
    }
}

/// Result of a successful parse
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub store: GeometryStore,
    pub report: ParseReport,
}

/// OBJ parser configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjParser {
    strict: bool,
}

impl ObjParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on the first malformed record instead of skipping it
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ParseOutcome> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), strict = self.strict, "parsing OBJ file");

        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut outcome = self
            .parse_reader(BufReader::new(file))
            .map_err(|err| match err {
                Error::Read(source) => Error::Io {
                    path: path.to_path_buf(),
                    source,
                },
                other => other,
            })?;
        outcome.store.set_path(path);

        let counts = outcome.report.counts;
        tracing::info!(
            path = %path.display(),
            vertices = counts.vertices,
            texcoords = counts.texcoords,
            normals = counts.normals,
            faces = counts.faces,
            malformed = outcome.report.malformed.len(),
            "parsed mesh"
        );

        Ok(outcome)
    }

    pub fn parse_str(&self, input: &str) -> Result<ParseOutcome> {
        self.parse_reader(input.as_bytes())
    }

    pub fn parse_reader<R: BufRead>(&self, mut reader: R) -> Result<ParseOutcome> {
        let mut store = GeometryStore::new();
        let mut report = ParseReport::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            report.lines += 1;

            let text = String::from_utf8_lossy(&buf);
            let line = text.trim_end_matches(|c: char| c == '\n' || c == '\r');

            match parse_record(line) {
                Record::Vertex(v) => store.push_vertex(v),
                Record::TexCoord(t) => store.push_texcoord(t),
                Record::Normal(n) => store.push_normal(n),
                Record::Face(f) => store.push_face(f),
                Record::Ignored => report.ignored += 1,
                Record::Malformed { tag, reason } => {
                    if self.strict {
                        return Err(Error::MalformedRecord {
                            line: report.lines,
                            tag,
                            reason,
                        });
                    }
                    tracing::warn!(line = report.lines, %tag, %reason, "skipping malformed record");
                    report.malformed.push(MalformedRecord {
                        line_number: report.lines,
                        tag,
                        reason,
                    });
                }
            }
        }

        report.counts = store.counts();
        tracing::debug!(lines = report.lines, ignored = report.ignored, "finished parsing");

        Ok(ParseOutcome { store, report })
    }
}

/// Parse an OBJ file leniently, skipping malformed records
pub fn parse_file(path: impl AsRef<Path>) -> Result<GeometryStore> {
    ObjParser::new().parse_file(path).map(|outcome| outcome.store)
}
