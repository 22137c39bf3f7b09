//! Map parser: builds entities and brushes from tokens.
//!
//! Face lines have the form
//! `( x y z ) ( x y z ) ( x y z ) shader shiftS shiftT rotate scaleS scaleT`
//! optionally followed, on the same line, by
//! `contentFlags surfaceFlags value`.

use radiant_brush::{
    shader_from_map_name, Brush, BrushError, ContentsFlagsValue, Face, FaceShader, TexDef,
    MAX_FACES,
};
use radiant_math::Point3;

use crate::document::{MapDocument, MapEntity};
use crate::error::MapError;
use crate::lexer::{Lexer, SpannedToken, Token};

/// Parser for `.map` files.
pub struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    max_world_coord: Option<f64>,
}

impl Parser {
    /// Parse a map from bytes.
    pub fn parse(input: &[u8]) -> Result<MapDocument, MapError> {
        Self::new(input, None)?.parse_document()
    }

    /// Parse a map, building brushes with the given world bounds.
    pub fn parse_with_max_world_coord(
        input: &[u8],
        max_world_coord: f64,
    ) -> Result<MapDocument, MapError> {
        Self::new(input, Some(max_world_coord))?.parse_document()
    }

    fn new(input: &[u8], max_world_coord: Option<f64>) -> Result<Self, MapError> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self {
            tokens,
            pos: 0,
            max_world_coord,
        })
    }

    fn parse_document(&mut self) -> Result<MapDocument, MapError> {
        let mut entities = Vec::new();
        while !self.is_at_end() {
            let index = entities.len();
            entities.push(self.parse_entity(index)?);
        }
        log::debug!("parsed {} entities", entities.len());
        Ok(MapDocument { entities })
    }

    fn parse_entity(&mut self, index: usize) -> Result<MapEntity, MapError> {
        self.expect_token(&Token::LBrace, "entity")?;
        let mut entity = MapEntity::default();

        loop {
            let tok = self.next("entity")?;
            match tok.token {
                Token::RBrace => break,
                Token::LBrace => {
                    let brush = self.parse_brush(index, entity.brushes.len())?;
                    entity.brushes.push(brush);
                }
                Token::Quoted(key) => {
                    let value = match self.next("entity")?.token {
                        Token::Quoted(v) => v,
                        other => {
                            return Err(MapError::parser(
                                tok.pos.line,
                                format!("expected value for key '{key}', got {other:?}"),
                            ))
                        }
                    };
                    entity.properties.push((key, value));
                }
                other => {
                    return Err(MapError::parser(
                        tok.pos.line,
                        format!("unexpected token in entity: {other:?}"),
                    ))
                }
            }
        }

        Ok(entity)
    }

    fn parse_brush(&mut self, entity: usize, index: usize) -> Result<Brush, MapError> {
        let mut faces = Vec::new();
        while !self.check_token(&Token::RBrace) {
            faces.push(self.parse_face()?);
            if faces.len() > MAX_FACES {
                return Err(MapError::Brush {
                    entity,
                    brush: index,
                    source: BrushError::TooManyFaces(MAX_FACES),
                });
            }
        }
        self.expect_token(&Token::RBrace, "brush")?;

        // faces keep their own detail bits on import
        let mut brush = Brush::from_faces(faces);
        if let Some(max) = self.max_world_coord {
            brush.set_max_world_coord(max);
        }
        brush.evaluate_brep();
        if !brush.has_contributing_faces() {
            log::warn!("brush {index} of entity {entity} has no contributing faces");
        }
        Ok(brush)
    }

    fn parse_face(&mut self) -> Result<Face, MapError> {
        let p0 = self.parse_point()?;
        let p1 = self.parse_point()?;
        let p2 = self.parse_point()?;

        let shader = match self.next("face")?.token {
            Token::Word(name) | Token::Quoted(name) => shader_from_map_name(&name),
            other => {
                return Err(self.error_here(format!("expected shader name, got {other:?}")));
            }
        };

        let shift_s = self.parse_number()?;
        let shift_t = self.parse_number()?;
        let rotate = self.parse_number()?;
        let scale_s = self.parse_number()?;
        let scale_t = self.parse_number()?;
        let texdef = TexDef {
            shift: [shift_s, shift_t],
            scale: [scale_s, scale_t],
            rotate,
        };

        let flags = if self.word_on_same_line() {
            let content = self.parse_integer()?;
            let surface = self.parse_integer()?;
            let value = self.parse_integer()?;
            ContentsFlagsValue::new(surface as u32, content as u32, value as i32, true)
        } else {
            ContentsFlagsValue::default()
        };

        Ok(Face::with_shader(
            p0,
            p1,
            p2,
            FaceShader::with_flags(&shader, flags),
            texdef,
        ))
    }

    fn parse_point(&mut self) -> Result<Point3, MapError> {
        self.expect_token(&Token::LParen, "plane point")?;
        let x = self.parse_number()?;
        let y = self.parse_number()?;
        let z = self.parse_number()?;
        self.expect_token(&Token::RParen, "plane point")?;
        Ok(Point3::new(x, y, z))
    }

    fn parse_number(&mut self) -> Result<f64, MapError> {
        let tok = self.next("number")?;
        match &tok.token {
            Token::Word(w) => w
                .parse::<f64>()
                .map_err(|_| MapError::parser(tok.pos.line, format!("invalid number: {w}"))),
            other => Err(MapError::parser(
                tok.pos.line,
                format!("expected number, got {other:?}"),
            )),
        }
    }

    fn parse_integer(&mut self) -> Result<i64, MapError> {
        let tok = self.next("integer")?;
        match &tok.token {
            Token::Word(w) => w
                .parse::<i64>()
                .map_err(|_| MapError::parser(tok.pos.line, format!("invalid integer: {w}"))),
            other => Err(MapError::parser(
                tok.pos.line,
                format!("expected integer, got {other:?}"),
            )),
        }
    }

    /// True if the next token is a word on the line of the previous token.
    fn word_on_same_line(&self) -> bool {
        let Some(prev) = self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) else {
            return false;
        };
        matches!(
            self.peek(),
            Some(SpannedToken { token: Token::Word(_), pos }) if pos.line == prev.pos.line
        )
    }

    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self, context: &str) -> Result<SpannedToken, MapError> {
        let tok = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| MapError::UnexpectedEof(format!("inside {context}")))?;
        self.pos += 1;
        Ok(tok)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn check_token(&self, expected: &Token) -> bool {
        self.peek().map(|t| &t.token == expected).unwrap_or(false)
    }

    fn expect_token(&mut self, expected: &Token, context: &str) -> Result<(), MapError> {
        let tok = self.next(context)?;
        if &tok.token == expected {
            Ok(())
        } else {
            Err(MapError::parser(
                tok.pos.line,
                format!("expected {expected:?} in {context}, got {:?}", tok.token),
            ))
        }
    }

    fn error_here(&self, message: String) -> MapError {
        let line = self
            .pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.pos.line)
            .unwrap_or(0);
        MapError::parser(line, message)
    }
}
