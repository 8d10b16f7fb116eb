//! Polynomial arithmetic over Z_q[X]/(X^256 + 1)
//!
//! [`Poly`] is an immutable ring element: every operation returns a new
//! value. Each element records whether it holds plain coefficients or NTT
//! residues; combining elements from different domains is a programmer
//! error and panics. The modulus is part of the type, so ML-KEM and ML-DSA
//! elements can never be mixed.

use crate::error::{Error, Result};
use crate::ntt::{self, add_mod, mul_mod, sub_mod, RingModulus};
use crate::params::N;
use core::marker::PhantomData;
use zeroize::Zeroize;

/// Representation held by a ring element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Plain polynomial coefficients
    Coefficient,
    /// NTT residues
    Transformed,
}

/// Ring element with 256 coefficients in `[0, q)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poly<M: RingModulus> {
    coeffs: [u32; N],
    domain: Domain,
    _ring: PhantomData<M>,
}

impl<M: RingModulus> Poly<M> {
    /// Zero polynomial in the coefficient domain
    pub fn zero() -> Self {
        Self::zero_in(Domain::Coefficient)
    }

    /// Zero element of the given domain
    pub fn zero_in(domain: Domain) -> Self {
        Self {
            coeffs: [0; N],
            domain,
            _ring: PhantomData,
        }
    }

    /// Build an element, reducing every coefficient mod q
    pub fn from_coeffs(mut coeffs: [u32; N], domain: Domain) -> Self {
        for c in coeffs.iter_mut() {
            *c %= M::Q;
        }
        Self {
            coeffs,
            domain,
            _ring: PhantomData,
        }
    }

    /// Build an element from a slice that must hold exactly 256 values
    pub fn try_from_slice(values: &[u32], domain: Domain) -> Result<Self> {
        let coeffs: [u32; N] = values
            .try_into()
            .map_err(|_| Error::length("ring element", N, values.len()))?;
        Ok(Self::from_coeffs(coeffs, domain))
    }

    /// Build a coefficient-domain element from signed representatives
    pub fn from_signed(values: &[i32; N]) -> Self {
        let mut coeffs = [0u32; N];
        for (c, &v) in coeffs.iter_mut().zip(values) {
            *c = ntt::reduce_signed::<M>(i64::from(v));
        }
        Self::from_coeffs(coeffs, Domain::Coefficient)
    }

    /// Coefficients in `[0, q)`
    pub fn coeffs(&self) -> &[u32; N] {
        &self.coeffs
    }

    /// Domain tag
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Coefficient `i` as its representative in `(-q/2, q/2]`
    pub fn centered(&self, i: usize) -> i32 {
        centered::<M>(self.coeffs[i])
    }

    /// Largest absolute centered coefficient
    pub fn infinity_norm(&self) -> u32 {
        self.coeffs
            .iter()
            .map(|&c| centered::<M>(c).unsigned_abs())
            .max()
            .unwrap_or(0)
    }

    /// Apply `f` to every coefficient, keeping the domain
    pub fn map(&self, f: impl Fn(u32) -> u32) -> Self {
        let mut coeffs = self.coeffs;
        for c in coeffs.iter_mut() {
            *c = f(*c) % M::Q;
        }
        Self::from_coeffs(coeffs, self.domain)
    }

    fn zip_with(&self, other: &Self, f: impl Fn(u32, u32) -> u32) -> Self {
        assert_eq!(
            self.domain, other.domain,
            "ring elements in different domains"
        );
        let mut coeffs = [0u32; N];
        for ((c, &a), &b) in coeffs.iter_mut().zip(&self.coeffs).zip(&other.coeffs) {
            *c = f(a, b);
        }
        Self {
            coeffs,
            domain: self.domain,
            _ring: PhantomData,
        }
    }

    /// Sum of two elements in the same domain
    pub fn add(&self, other: &Self) -> Self {
        self.zip_with(other, add_mod::<M>)
    }

    /// Difference of two elements in the same domain
    pub fn sub(&self, other: &Self) -> Self {
        self.zip_with(other, sub_mod::<M>)
    }

    /// Additive inverse
    pub fn neg(&self) -> Self {
        Self::zero_in(self.domain).sub(self)
    }

    /// Multiply every coefficient by `scalar`
    pub fn scale(&self, scalar: u32) -> Self {
        let s = scalar % M::Q;
        self.map(|c| mul_mod::<M>(c, s))
    }

    /// Coefficient-wise product of two elements in the same domain
    pub fn pointwise(&self, other: &Self) -> Self {
        self.zip_with(other, mul_mod::<M>)
    }

    /// Ring product of two transformed elements
    pub fn multiply(&self, other: &Self) -> Self {
        assert_eq!(self.domain, Domain::Transformed, "multiply needs NTT form");
        assert_eq!(other.domain, Domain::Transformed, "multiply needs NTT form");
        Self {
            coeffs: M::multiply_transformed(&self.coeffs, &other.coeffs),
            domain: Domain::Transformed,
            _ring: PhantomData,
        }
    }

    /// Forward NTT
    pub fn ntt(&self) -> Self {
        assert_eq!(self.domain, Domain::Coefficient, "element already transformed");
        Self {
            coeffs: ntt::forward::<M>(&self.coeffs),
            domain: Domain::Transformed,
            _ring: PhantomData,
        }
    }

    /// Inverse NTT
    pub fn inv_ntt(&self) -> Self {
        assert_eq!(self.domain, Domain::Transformed, "element not transformed");
        Self {
            coeffs: ntt::inverse::<M>(&self.coeffs),
            domain: Domain::Coefficient,
            _ring: PhantomData,
        }
    }
}

impl<M: RingModulus> Zeroize for Poly<M> {
    fn zeroize(&mut self) {
        self.coeffs.zeroize();
    }
}

/// Representative of `c mod q` in `(-q/2, q/2]`
pub fn centered<M: RingModulus>(c: u32) -> i32 {
    let c = c % M::Q;
    if c > M::Q / 2 {
        c as i32 - M::Q as i32
    } else {
        c as i32
    }
}

/// Vector of ring elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolyVec<M: RingModulus> {
    polys: Vec<Poly<M>>,
}

impl<M: RingModulus> PolyVec<M> {
    /// Vector of `len` zero elements
    pub fn zero(len: usize, domain: Domain) -> Self {
        Self {
            polys: vec![Poly::zero_in(domain); len],
        }
    }

    /// Wrap existing elements
    pub fn from_vec(polys: Vec<Poly<M>>) -> Self {
        Self { polys }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.polys.len()
    }

    /// Whether the vector is empty
    pub fn is_empty(&self) -> bool {
        self.polys.is_empty()
    }

    /// Element `i`
    pub fn get(&self, i: usize) -> &Poly<M> {
        &self.polys[i]
    }

    /// Iterate over the elements
    pub fn iter(&self) -> core::slice::Iter<'_, Poly<M>> {
        self.polys.iter()
    }

    fn zip_with(&self, other: &Self, f: impl Fn(&Poly<M>, &Poly<M>) -> Poly<M>) -> Self {
        assert_eq!(self.len(), other.len(), "vector lengths differ");
        Self {
            polys: self.polys.iter().zip(&other.polys).map(|(a, b)| f(a, b)).collect(),
        }
    }

    /// Element-wise sum
    pub fn add(&self, other: &Self) -> Self {
        self.zip_with(other, Poly::add)
    }

    /// Element-wise difference
    pub fn sub(&self, other: &Self) -> Self {
        self.zip_with(other, Poly::sub)
    }

    /// Apply `f` to every element
    pub fn map(&self, f: impl Fn(&Poly<M>) -> Poly<M>) -> Self {
        Self {
            polys: self.polys.iter().map(f).collect(),
        }
    }

    /// Forward NTT of every element
    pub fn ntt(&self) -> Self {
        self.map(Poly::ntt)
    }

    /// Inverse NTT of every element
    pub fn inv_ntt(&self) -> Self {
        self.map(Poly::inv_ntt)
    }

    /// Multiply every element by one transformed element
    pub fn multiply_each(&self, c: &Poly<M>) -> Self {
        self.map(|p| p.multiply(c))
    }

    /// Inner product of two transformed vectors
    pub fn inner_product(&self, other: &Self) -> Poly<M> {
        assert_eq!(self.len(), other.len(), "vector lengths differ");
        self.polys
            .iter()
            .zip(&other.polys)
            .fold(Poly::zero_in(Domain::Transformed), |acc, (a, b)| {
                acc.add(&a.multiply(b))
            })
    }

    /// Largest absolute centered coefficient over all elements
    pub fn infinity_norm(&self) -> u32 {
        self.polys.iter().map(Poly::infinity_norm).max().unwrap_or(0)
    }
}

impl<M: RingModulus> Zeroize for PolyVec<M> {
    fn zeroize(&mut self) {
        for p in self.polys.iter_mut() {
            p.zeroize();
        }
    }
}

/// Matrix of ring elements, stored row by row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolyMatrix<M: RingModulus> {
    rows: Vec<PolyVec<M>>,
}

impl<M: RingModulus> PolyMatrix<M> {
    /// Wrap rows of equal length
    pub fn from_rows(rows: Vec<PolyVec<M>>) -> Self {
        if let Some(first) = rows.first() {
            assert!(
                rows.iter().all(|r| r.len() == first.len()),
                "ragged matrix"
            );
        }
        Self { rows }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.rows.first().map_or(0, PolyVec::len)
    }

    /// Entry at row `i`, column `j`
    pub fn get(&self, i: usize, j: usize) -> &Poly<M> {
        self.rows[i].get(j)
    }

    /// `A · v` with all operands transformed
    pub fn mul_vec(&self, v: &PolyVec<M>) -> PolyVec<M> {
        assert_eq!(self.cols(), v.len(), "matrix/vector dimensions differ");
        PolyVec::from_vec(self.rows.iter().map(|row| row.inner_product(v)).collect())
    }

    /// `Aᵀ · v` with all operands transformed
    pub fn transpose_mul_vec(&self, v: &PolyVec<M>) -> PolyVec<M> {
        assert_eq!(self.rows(), v.len(), "matrix/vector dimensions differ");
        let out = (0..self.cols())
            .map(|j| {
                self.rows.iter().zip(v.iter()).fold(
                    Poly::zero_in(Domain::Transformed),
                    |acc, (row, x)| acc.add(&row.get(j).multiply(x)),
                )
            })
            .collect();
        PolyVec::from_vec(out)
    }
}
